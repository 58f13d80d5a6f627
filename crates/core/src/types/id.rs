//! Typed primary keys.
//!
//! Every table in the `site` schema uses a `BIGSERIAL` key. Wrapping them in
//! distinct newtypes keeps a `ProjectId` from being passed where a
//! `GalleryImageId` is expected.

/// Define a `BIGINT`-backed ID newtype.
///
/// The generated type is `Copy`, orders and hashes like the inner `i64`,
/// serializes as a bare number, and (with the `postgres` feature) binds
/// directly in `sqlx` queries.
///
/// ```rust
/// # use keystone_core::define_id;
/// define_id!(CrewId, "A crew member.");
///
/// let id = CrewId::new(7);
/// assert_eq!(id.get(), 7);
/// assert_eq!(id.to_string(), "7");
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw database key.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// The raw database key.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i64 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i64 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                <i64 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value).map(Self)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::core::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i64 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(ProjectId, "A portfolio project.");
define_id!(GalleryImageId, "A persisted image in a project gallery.");
define_id!(BlogPostId, "A blog post.");
define_id!(TestimonialId, "A client testimonial.");
define_id!(QuoteRequestId, "A quote request from the lead funnel.");
define_id!(MessageId, "A contact-form message.");
define_id!(SubscriberId, "A newsletter subscriber.");
define_id!(JobPostingId, "An open position on the careers page.");
define_id!(JobApplicationId, "An application to a job posting.");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_bare_number() {
        let json = serde_json::to_string(&ProjectId::new(42)).unwrap();
        assert_eq!(json, "42");

        let id: GalleryImageId = serde_json::from_str("9").unwrap();
        assert_eq!(id, GalleryImageId::new(9));
    }

    #[test]
    fn test_parse_from_path_segment() {
        let id: MessageId = "15".parse().unwrap();
        assert_eq!(id.get(), 15);
        assert!("abc".parse::<MessageId>().is_err());
    }
}
