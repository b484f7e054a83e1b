//! Field catalogs mapping the on-disk column type code to a stable name.

use std::fmt;

use serde::Serialize;

use super::TableKind;

macro_rules! field_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:literal,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            #[must_use]
            pub const fn from_code(code: u16) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)*
                    _ => None,
                }
            }

            #[must_use]
            pub const fn code(self) -> u16 {
                match self {
                    $(Self::$variant => $code,)*
                }
            }

            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => stringify!($variant),)*
                }
            }
        }
    };
}

/// Semantic identifier of a decoded column, independent of its wire code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FieldType {
    Activity(ActivityField),
    ActBar(ActBarField),
    Resource(ResourceField),
}

impl FieldType {
    /// Resolves a column type code within the catalog of `table`.
    #[must_use]
    pub const fn resolve(table: TableKind, code: u16) -> Option<Self> {
        match table {
            TableKind::Activities => match ActivityField::from_code(code) {
                Some(field) => Some(Self::Activity(field)),
                None => None,
            },
            TableKind::ActBars => match ActBarField::from_code(code) {
                Some(field) => Some(Self::ActBar(field)),
                None => None,
            },
            TableKind::Resources => match ResourceField::from_code(code) {
                Some(field) => Some(Self::Resource(field)),
                None => None,
            },
        }
    }

    #[must_use]
    pub const fn table(self) -> TableKind {
        match self {
            Self::Activity(_) => TableKind::Activities,
            Self::ActBar(_) => TableKind::ActBars,
            Self::Resource(_) => TableKind::Resources,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Activity(field) => field.name(),
            Self::ActBar(field) => field.name(),
            Self::Resource(field) => field.name(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table(), self.name())
    }
}

impl From<ActivityField> for FieldType {
    fn from(field: ActivityField) -> Self {
        Self::Activity(field)
    }
}

impl From<ActBarField> for FieldType {
    fn from(field: ActBarField) -> Self {
        Self::ActBar(field)
    }
}

impl From<ResourceField> for FieldType {
    fn from(field: ResourceField) -> Self {
        Self::Resource(field)
    }
}

field_enum! {
    /// Fields of the ACTIVITIES table.
    ///
    /// These type codes are provisional: the numbering of each band (such as
    /// `Number1 = 250` and `Flag1 = 710`) has not been checked against files
    /// written by FastTrack, so a real file may map a column to the wrong name.
    ActivityField {
        ActivityRowId = 1,
        ActivityName = 2,
        Wbs = 3,
        ActivityGuid = 12,
        Notes = 170,
        Number1 = 250,
        Number2 = 251,
        Number3 = 252,
        Number4 = 253,
        Number5 = 254,
        Number6 = 255,
        Number7 = 256,
        Number8 = 257,
        Number9 = 258,
        Number10 = 259,
        Number11 = 260,
        Number12 = 261,
        Number13 = 262,
        Number14 = 263,
        Number15 = 264,
        Number16 = 265,
        Number17 = 266,
        Number18 = 267,
        Number19 = 268,
        Number20 = 269,
        Flag1 = 710,
        Flag2 = 711,
        Flag3 = 712,
        Flag4 = 713,
        Flag5 = 714,
        Flag6 = 715,
        Flag7 = 716,
        Flag8 = 717,
        Flag9 = 718,
        Flag10 = 719,
        Flag11 = 720,
        Flag12 = 721,
        Flag13 = 722,
        Flag14 = 723,
        Flag15 = 724,
        Flag16 = 725,
        Flag17 = 726,
        Flag18 = 727,
        Flag19 = 728,
        Flag20 = 729,
        Text1 = 450,
        Text2 = 451,
        Text3 = 452,
        Text4 = 453,
        Text5 = 454,
        Text6 = 455,
        Text7 = 456,
        Text8 = 457,
        Text9 = 458,
        Text10 = 459,
        Text11 = 460,
        Text12 = 461,
        Text13 = 462,
        Text14 = 463,
        Text15 = 464,
        Text16 = 465,
        Text17 = 466,
        Text18 = 467,
        Text19 = 468,
        Text20 = 469,
        Text21 = 470,
        Text22 = 471,
        Text23 = 472,
        Text24 = 473,
        Text25 = 474,
        Text26 = 475,
        Text27 = 476,
        Text28 = 477,
        Text29 = 478,
        Text30 = 479,
    }
}

field_enum! {
    /// Fields of the ACTBARS table: one row per bar drawn for an activity.
    ///
    /// These type codes are provisional and have not been checked against
    /// files written by FastTrack.
    ActBarField {
        BarId = 1,
        Activity = 2,
        StartDate = 3,
        StartTime = 4,
        FinishDate = 5,
        FinishTime = 6,
        Duration = 7,
        Work = 8,
        PercentComplete = 9,
        ResourcesAssigned = 10,
        Predecessors = 11,
        Successors = 12,
        ActualStartDate = 13,
        ActualStartTime = 14,
        ActualFinishDate = 15,
        ActualFinishTime = 16,
        ActualDuration = 17,
        EarlyStartDate = 18,
        EarlyStartTime = 19,
        EarlyFinishDate = 20,
        EarlyFinishTime = 21,
        LateStartDate = 22,
        LateStartTime = 23,
        LateFinishDate = 24,
        LateFinishTime = 25,
        RevisedStartDate = 26,
        RevisedStartTime = 27,
        RevisedFinishDate = 28,
        RevisedFinishTime = 29,
        RevisedDuration = 30,
        ConstraintDate = 31,
        ConstraintTime = 32,
        FreeFloat = 33,
        TotalFloat = 34,
        StartFloat = 35,
        FinishFloat = 36,
        Critical = 37,
        EffortDriven = 38,
        IgnoreResourceCalendars = 39,
        FixedCost = 40,
        BaselineStartDate1 = 100,
        BaselineStartDate2 = 101,
        BaselineStartDate3 = 102,
        BaselineStartDate4 = 103,
        BaselineStartDate5 = 104,
        BaselineStartDate6 = 105,
        BaselineStartDate7 = 106,
        BaselineStartDate8 = 107,
        BaselineStartDate9 = 108,
        BaselineStartDate10 = 109,
        BaselineStartTime1 = 110,
        BaselineStartTime2 = 111,
        BaselineStartTime3 = 112,
        BaselineStartTime4 = 113,
        BaselineStartTime5 = 114,
        BaselineStartTime6 = 115,
        BaselineStartTime7 = 116,
        BaselineStartTime8 = 117,
        BaselineStartTime9 = 118,
        BaselineStartTime10 = 119,
        BaselineFinishDate1 = 120,
        BaselineFinishDate2 = 121,
        BaselineFinishDate3 = 122,
        BaselineFinishDate4 = 123,
        BaselineFinishDate5 = 124,
        BaselineFinishDate6 = 125,
        BaselineFinishDate7 = 126,
        BaselineFinishDate8 = 127,
        BaselineFinishDate9 = 128,
        BaselineFinishDate10 = 129,
        BaselineFinishTime1 = 130,
        BaselineFinishTime2 = 131,
        BaselineFinishTime3 = 132,
        BaselineFinishTime4 = 133,
        BaselineFinishTime5 = 134,
        BaselineFinishTime6 = 135,
        BaselineFinishTime7 = 136,
        BaselineFinishTime8 = 137,
        BaselineFinishTime9 = 138,
        BaselineFinishTime10 = 139,
        BaselineDuration1 = 140,
        BaselineDuration2 = 141,
        BaselineDuration3 = 142,
        BaselineDuration4 = 143,
        BaselineDuration5 = 144,
        BaselineDuration6 = 145,
        BaselineDuration7 = 146,
        BaselineDuration8 = 147,
        BaselineDuration9 = 148,
        BaselineDuration10 = 149,
        BaselineWork1 = 150,
        BaselineWork2 = 151,
        BaselineWork3 = 152,
        BaselineWork4 = 153,
        BaselineWork5 = 154,
        BaselineWork6 = 155,
        BaselineWork7 = 156,
        BaselineWork8 = 157,
        BaselineWork9 = 158,
        BaselineWork10 = 159,
        BaselineCost1 = 160,
        BaselineCost2 = 161,
        BaselineCost3 = 162,
        BaselineCost4 = 163,
        BaselineCost5 = 164,
        BaselineCost6 = 165,
        BaselineCost7 = 166,
        BaselineCost8 = 167,
        BaselineCost9 = 168,
        BaselineCost10 = 169,
        Cost1 = 200,
        Cost2 = 201,
        Cost3 = 202,
        Cost4 = 203,
        Cost5 = 204,
        Cost6 = 205,
        Cost7 = 206,
        Cost8 = 207,
        Cost9 = 208,
        Cost10 = 209,
        Date1 = 210,
        Date2 = 211,
        Date3 = 212,
        Date4 = 213,
        Date5 = 214,
        Date6 = 215,
        Date7 = 216,
        Date8 = 217,
        Date9 = 218,
        Date10 = 219,
        Duration1 = 220,
        Duration2 = 221,
        Duration3 = 222,
        Duration4 = 223,
        Duration5 = 224,
        Duration6 = 225,
        Duration7 = 226,
        Duration8 = 227,
        Duration9 = 228,
        Duration10 = 229,
        StartDate1 = 230,
        StartDate2 = 231,
        StartDate3 = 232,
        StartDate4 = 233,
        StartDate5 = 234,
        StartDate6 = 235,
        StartDate7 = 236,
        StartDate8 = 237,
        StartDate9 = 238,
        StartDate10 = 239,
        StartTime1 = 240,
        StartTime2 = 241,
        StartTime3 = 242,
        StartTime4 = 243,
        StartTime5 = 244,
        StartTime6 = 245,
        StartTime7 = 246,
        StartTime8 = 247,
        StartTime9 = 248,
        StartTime10 = 249,
        FinishDate1 = 300,
        FinishDate2 = 301,
        FinishDate3 = 302,
        FinishDate4 = 303,
        FinishDate5 = 304,
        FinishDate6 = 305,
        FinishDate7 = 306,
        FinishDate8 = 307,
        FinishDate9 = 308,
        FinishDate10 = 309,
        FinishTime1 = 310,
        FinishTime2 = 311,
        FinishTime3 = 312,
        FinishTime4 = 313,
        FinishTime5 = 314,
        FinishTime6 = 315,
        FinishTime7 = 316,
        FinishTime8 = 317,
        FinishTime9 = 318,
        FinishTime10 = 319,
        Number1 = 250,
        Number2 = 251,
        Number3 = 252,
        Number4 = 253,
        Number5 = 254,
        Number6 = 255,
        Number7 = 256,
        Number8 = 257,
        Number9 = 258,
        Number10 = 259,
        Number11 = 260,
        Number12 = 261,
        Number13 = 262,
        Number14 = 263,
        Number15 = 264,
        Number16 = 265,
        Number17 = 266,
        Number18 = 267,
        Number19 = 268,
        Number20 = 269,
    }
}

field_enum! {
    /// Fields of the RESOURCES table.
    ResourceField {
        ResourceId = 1,
        ResourceName = 2,
        Category = 3,
        PerUseCost = 4,
        StandardRate = 5,
        OvertimeRate = 6,
        Work = 7,
        TotalResourceCost = 8,
        Rsrcdata = 9,
        Rsrctinfo = 11,
        ResourceGuid = 12,
        ResourceFileGuid = 13,
        ResourceTimestamp = 14,
        ResourceVersion = 15,
        ResourceWorkCalendarId = 16,
        BaseCalendar = 17,
        Group = 18,
        Code = 19,
        MaterialLabel = 20,
        BusinessAddressStreet = 50,
        BusinessAddressCity = 51,
        BusinessAddressState = 52,
        BusinessAddressZip = 53,
        BusinessAddressCountry = 54,
        HomeAddressStreet = 55,
        HomeAddressCity = 56,
        HomeAddressState = 57,
        HomeAddressZip = 58,
        HomeAddressCountry = 59,
        ResourceImage = 70,
        FirstName = 80,
        PhoneticFirstName = 81,
        LastName = 82,
        PhoneticLastName = 83,
        MiddleName = 84,
        PhoneticMiddleName = 85,
        Prefix = 86,
        Suffix = 87,
        Initials = 88,
        Nickname = 89,
        Company = 90,
        JobTitle = 91,
        Department = 92,
        EmployeeId = 93,
        Manager = 94,
        Assistant = 95,
        CustomerId = 96,
        GovernmentId = 97,
        MainPhone = 100,
        BusinessPhone = 101,
        BusinessPhone2 = 102,
        BusinessFax = 103,
        HomePhone = 104,
        HomePhone2 = 105,
        HomeFax = 106,
        MobilePhone = 107,
        MobilePhone2 = 108,
        Pager = 109,
        AssistantsPhone = 110,
        EmailAddress = 120,
        EmailAddress2 = 121,
        EmailAddress3 = 122,
        EmailAddress4 = 123,
        EmailAddress5 = 124,
        EmailAddress6 = 125,
        ImAddress = 140,
        ImAddress2 = 141,
        ImAddress3 = 142,
        ImAddress4 = 143,
        ImAddress5 = 144,
        ImAddress6 = 145,
        BusinessUrl = 160,
        HomeUrl = 161,
        FreeBusyUrl = 162,
        ResourceNotes = 170,
        ResourceCustomText = 171,
        ResourceCustomText2 = 172,
        ResourceCustomText3 = 173,
        ResourceCustomText4 = 174,
        Number1 = 250,
        Number2 = 251,
        Number3 = 252,
        Number4 = 253,
        Number5 = 254,
        Number6 = 255,
        Number7 = 256,
        Number8 = 257,
        Number9 = 258,
        Number10 = 259,
        Number11 = 260,
        Number12 = 261,
        Number13 = 262,
        Number14 = 263,
        Number15 = 264,
        Number16 = 265,
        Number17 = 266,
        Number18 = 267,
        Number19 = 268,
        Number20 = 269,
        Number21 = 270,
        Number22 = 271,
        Number23 = 272,
        Number24 = 273,
        Number25 = 274,
        Number26 = 275,
        Number27 = 276,
        Number28 = 277,
        Number29 = 278,
        Number30 = 279,
        Number31 = 280,
        Number32 = 281,
        Number33 = 282,
        Number34 = 283,
        Number35 = 284,
        Number36 = 285,
        Number37 = 286,
        Number38 = 287,
        Number39 = 288,
        Number40 = 289,
        Number41 = 290,
        Number42 = 291,
        Number43 = 292,
        Number44 = 293,
        Number45 = 294,
        Number46 = 295,
        Number47 = 296,
        Number48 = 297,
        Number49 = 298,
        Number50 = 299,
        Text1 = 450,
        Text2 = 451,
        Text3 = 452,
        Text4 = 453,
        Text5 = 454,
        Text6 = 455,
        Text7 = 456,
        Text8 = 457,
        Text9 = 458,
        Text10 = 459,
        Text11 = 460,
        Text12 = 461,
        Text13 = 462,
        Text14 = 463,
        Text15 = 464,
        Text16 = 465,
        Text17 = 466,
        Text18 = 467,
        Text19 = 468,
        Text20 = 469,
        Text21 = 470,
        Text22 = 471,
        Text23 = 472,
        Text24 = 473,
        Text25 = 474,
        Text26 = 475,
        Text27 = 476,
        Text28 = 477,
        Text29 = 478,
        Text30 = 479,
        Text31 = 480,
        Text32 = 481,
        Text33 = 482,
        Text34 = 483,
        Text35 = 484,
        Text36 = 485,
        Text37 = 486,
        Text38 = 487,
        Text39 = 488,
        Text40 = 489,
        Text41 = 490,
        Text42 = 491,
        Text43 = 492,
        Text44 = 493,
        Text45 = 494,
        Text46 = 495,
        Text47 = 496,
        Text48 = 497,
        Text49 = 498,
        Text50 = 499,
        Hyperlink1 = 650,
        Hyperlink2 = 651,
        Hyperlink3 = 652,
        Hyperlink4 = 653,
        Hyperlink5 = 654,
        Hyperlink6 = 655,
        Hyperlink7 = 656,
        Hyperlink8 = 657,
        Hyperlink9 = 658,
        Hyperlink10 = 659,
        Flag1 = 710,
        Flag2 = 711,
        Flag3 = 712,
        Flag4 = 713,
        Flag5 = 714,
        Flag6 = 715,
        Flag7 = 716,
        Flag8 = 717,
        Flag9 = 718,
        Flag10 = 719,
        Flag11 = 720,
        Flag12 = 721,
        Flag13 = 722,
        Flag14 = 723,
        Flag15 = 724,
        Flag16 = 725,
        Flag17 = 726,
        Flag18 = 727,
        Flag19 = 728,
        Flag20 = 729,
        Calculation1 = 780,
        Calculation2 = 781,
        Calculation3 = 782,
        Calculation4 = 783,
        Calculation5 = 784,
        Calculation6 = 785,
        Calculation7 = 786,
        Calculation8 = 787,
        Calculation9 = 788,
        Calculation10 = 789,
        Calculation11 = 790,
        Calculation12 = 791,
        Calculation13 = 792,
        Calculation14 = 793,
        Calculation15 = 794,
        Calculation16 = 795,
        Calculation17 = 796,
        Calculation18 = 797,
        Calculation19 = 798,
        Calculation20 = 799,
        Calculation21 = 800,
        Calculation22 = 801,
        Calculation23 = 802,
        Calculation24 = 803,
        Calculation25 = 804,
        Calculation26 = 805,
        Calculation27 = 806,
        Calculation28 = 807,
        Calculation29 = 808,
        Calculation30 = 809,
        Calculation31 = 810,
        Calculation32 = 811,
        Calculation33 = 812,
        Calculation34 = 813,
        Calculation35 = 814,
        Calculation36 = 815,
        Calculation37 = 816,
        Calculation38 = 817,
        Calculation39 = 818,
        Calculation40 = 819,
        Calculation41 = 820,
        Calculation42 = 821,
        Calculation43 = 822,
        Calculation44 = 823,
        Calculation45 = 824,
        Calculation46 = 825,
        Calculation47 = 826,
        Calculation48 = 827,
        Calculation49 = 828,
        Calculation50 = 829,
        Calculation51 = 830,
        Calculation52 = 831,
        Calculation53 = 832,
        Calculation54 = 833,
        Calculation55 = 834,
        Calculation56 = 835,
        Calculation57 = 836,
        Calculation58 = 837,
        Calculation59 = 838,
        Calculation60 = 839,
        Calculation61 = 840,
        Calculation62 = 841,
        Calculation63 = 842,
        Calculation64 = 843,
        Calculation65 = 844,
        Calculation66 = 845,
        Calculation67 = 846,
        Calculation68 = 847,
        Calculation69 = 848,
        Calculation70 = 849,
        Calculation71 = 850,
        Calculation72 = 851,
        Calculation73 = 852,
        Calculation74 = 853,
        Calculation75 = 854,
        Calculation76 = 855,
        Calculation77 = 856,
        Calculation78 = 857,
        Calculation79 = 858,
        Calculation80 = 859,
        Calculation81 = 860,
        Calculation82 = 861,
        Calculation83 = 862,
        Calculation84 = 863,
        Calculation85 = 864,
        Calculation86 = 865,
        Calculation87 = 866,
        Calculation88 = 867,
        Calculation89 = 868,
        Calculation90 = 869,
        Calculation91 = 870,
        Calculation92 = 871,
        Calculation93 = 872,
        Calculation94 = 873,
        Calculation95 = 874,
        Calculation96 = 875,
        Calculation97 = 876,
        Calculation98 = 877,
        Calculation99 = 878,
        Calculation100 = 879,
        Image1 = 930,
        Image2 = 931,
        Image3 = 932,
        Image4 = 933,
        Image5 = 934,
        Image6 = 935,
        Image7 = 936,
        Image8 = 937,
        Image9 = 938,
        Image10 = 939,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_depends_on_table() {
        assert_eq!(
            FieldType::resolve(TableKind::Activities, 2),
            Some(FieldType::Activity(ActivityField::ActivityName))
        );
        assert_eq!(
            FieldType::resolve(TableKind::Resources, 2),
            Some(FieldType::Resource(ResourceField::ResourceName))
        );
        assert_eq!(FieldType::resolve(TableKind::Activities, 9999), None);
    }

    #[test]
    fn codes_round_trip_through_catalog() {
        for code in 0..1000 {
            if let Some(field) = ResourceField::from_code(code) {
                assert_eq!(field.code(), code);
            }
        }
        assert_eq!(ResourceField::Flag1.code(), 710);
        assert_eq!(
            FieldType::from(ActBarField::Predecessors).to_string(),
            "ACTBARS.Predecessors"
        );
    }
}
