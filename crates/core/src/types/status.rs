//! Workflow states for moderated and tracked records.

use serde::{Deserialize, Serialize};

/// Moderation state of a client testimonial.
///
/// Public submissions land as `Pending` and only `Approved` ones are shown
/// on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "site.testimonial_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum TestimonialStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// Sales pipeline state of a quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "site.quote_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    /// New, nobody has followed up yet.
    #[default]
    Pending,
    Contacted,
    Quoted,
    Won,
    Lost,
    Archived,
}

impl QuoteStatus {
    /// Closed requests no longer show up in the default back-office list.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Won | Self::Lost | Self::Archived)
    }
}

/// Employment type shown on a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "site.employment_type", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Seasonal,
}

macro_rules! snake_case_str {
    ($ty:ty { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            /// The snake_case wire name.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(format!("invalid {}: {s}", stringify!($ty))),
                }
            }
        }
    };
}

snake_case_str!(TestimonialStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

snake_case_str!(QuoteStatus {
    Pending => "pending",
    Contacted => "contacted",
    Quoted => "quoted",
    Won => "won",
    Lost => "lost",
    Archived => "archived",
});

snake_case_str!(EmploymentType {
    FullTime => "full_time",
    PartTime => "part_time",
    Contract => "contract",
    Seasonal => "seasonal",
});

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde() {
        for status in [
            QuoteStatus::Pending,
            QuoteStatus::Contacted,
            QuoteStatus::Quoted,
            QuoteStatus::Won,
            QuoteStatus::Lost,
            QuoteStatus::Archived,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
            assert_eq!(status.to_string().parse::<QuoteStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("maybe".parse::<TestimonialStatus>().is_err());
        assert_eq!(
            "full_time".parse::<EmploymentType>().unwrap(),
            EmploymentType::FullTime
        );
    }

    #[test]
    fn test_closed_quote_states() {
        assert!(!QuoteStatus::Pending.is_closed());
        assert!(!QuoteStatus::Quoted.is_closed());
        assert!(QuoteStatus::Won.is_closed());
        assert!(QuoteStatus::Archived.is_closed());
    }
}
