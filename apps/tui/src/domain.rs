use std::fmt;
use std::str::FromStr;

/// Which insight export the dashboard is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Complaints,
    UseCases,
    ValueDrivers,
    MagicMoments,
}

impl DataKind {
    pub const ALL: [Self; 4] = [
        Self::Complaints,
        Self::UseCases,
        Self::ValueDrivers,
        Self::MagicMoments,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Complaints => "complaints",
            Self::UseCases => "use_cases",
            Self::ValueDrivers => "value_drivers",
            Self::MagicMoments => "magic_moments",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Complaints),
            1 => Some(Self::UseCases),
            2 => Some(Self::ValueDrivers),
            3 => Some(Self::MagicMoments),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Complaints => 0,
            Self::UseCases => 1,
            Self::ValueDrivers => 2,
            Self::MagicMoments => 3,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "complaints" | "complaint" => Some(Self::Complaints),
            "use_cases" | "use_case" | "usecases" => Some(Self::UseCases),
            "value_drivers" | "value_driver" | "valuedrivers" => Some(Self::ValueDrivers),
            "magic_moments" | "magic_moment" | "moments" => Some(Self::MagicMoments),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Complaints => "Complaints",
            Self::UseCases => "Use Cases",
            Self::ValueDrivers => "Value Drivers",
            Self::MagicMoments => "Magic Moments",
        }
    }

    /// Singular noun used in counts ("12 complaints").
    pub const fn item_noun(self) -> &'static str {
        match self {
            Self::Complaints => "complaints",
            Self::UseCases => "use cases",
            Self::ValueDrivers => "quotes",
            Self::MagicMoments => "moments",
        }
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Complaints => "complaints.json",
            Self::UseCases => "use_cases.json",
            Self::ValueDrivers => "value_drivers.json",
            Self::MagicMoments => "magic_moments.json",
        }
    }

    /// Table holding the extracted rows for this kind.
    pub const fn table_name(self) -> &'static str {
        self.as_str()
    }

    /// Column carrying the category; magic moments are uncategorized.
    pub const fn category_column(self) -> Option<&'static str> {
        match self {
            Self::Complaints => Some("complaint"),
            Self::UseCases => Some("use_case"),
            Self::ValueDrivers => Some("value_driver"),
            Self::MagicMoments => None,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Complaints => Self::UseCases,
            Self::UseCases => Self::ValueDrivers,
            Self::ValueDrivers => Self::MagicMoments,
            Self::MagicMoments => Self::Complaints,
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value).ok_or_else(|| {
            format!(
                "unknown data kind '{value}' \
                 (expected complaints, use_cases, value_drivers or magic_moments)"
            )
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TimeRange {
    #[default]
    All,
    ThreeMonths,
    SixMonths,
    OneYear,
}

impl TimeRange {
    pub const ALL: [Self; 4] = [Self::All, Self::ThreeMonths, Self::SixMonths, Self::OneYear];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::ThreeMonths => "3m",
            Self::SixMonths => "6m",
            Self::OneYear => "1y",
        }
    }

    pub const fn months_back(self) -> Option<u32> {
        match self {
            Self::All => None,
            Self::ThreeMonths => Some(3),
            Self::SixMonths => Some(6),
            Self::OneYear => Some(12),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "3m" | "3" => Some(Self::ThreeMonths),
            "6m" | "6" => Some(Self::SixMonths),
            "1y" | "12m" | "12" => Some(Self::OneYear),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All time",
            Self::ThreeMonths => "3 months",
            Self::SixMonths => "6 months",
            Self::OneYear => "1 year",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::All => 0,
            Self::ThreeMonths => 1,
            Self::SixMonths => 2,
            Self::OneYear => 3,
        }
    }

    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::ThreeMonths,
            Self::ThreeMonths => Self::SixMonths,
            Self::SixMonths => Self::OneYear,
            Self::OneYear => Self::All,
        }
    }

    pub const fn previous(self) -> Self {
        match self {
            Self::All => Self::OneYear,
            Self::ThreeMonths => Self::All,
            Self::SixMonths => Self::ThreeMonths,
            Self::OneYear => Self::SixMonths,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
            .ok_or_else(|| format!("unknown time range '{value}' (expected all, 3m, 6m or 1y)"))
    }
}

/// Reference point that item-level time filtering measures back from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeAnchor {
    /// First day of the cutoff month counted back from the newest month in the data.
    #[default]
    LatestData,
    /// Wall-clock now minus the range.
    WallClock,
}

impl TimeAnchor {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LatestData => "data",
            Self::WallClock => "now",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "data" | "latest" | "latest_data" => Some(Self::LatestData),
            "now" | "clock" | "wall_clock" => Some(Self::WallClock),
            _ => None,
        }
    }
}

impl FromStr for TimeAnchor {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
            .ok_or_else(|| format!("unknown time anchor '{value}' (expected data or now)"))
    }
}
