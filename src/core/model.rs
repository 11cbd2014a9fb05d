//! Defines application business models.

use crate::{err, error::LockboxError};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use utoipa::{openapi::RefOr, ToSchema};
use validify::Validate;

pub mod file;
pub mod node;
pub mod user;

/// Used to obtain paginated lists with a total number of items in
/// the tables.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct List<T> {
    pub total: Option<usize>,
    pub items: Vec<T>,
}

impl<'__s, T> ToSchema<'__s> for List<T>
where
    T: ToSchema<'__s>,
{
    fn schema() -> (
        &'__s str,
        utoipa::openapi::RefOr<utoipa::openapi::schema::Schema>,
    ) {
        let (_, item_schema) = T::schema();

        let list_schema = utoipa::openapi::schema::ObjectBuilder::new()
            .title(Some("List"))
            .property(
                "total",
                utoipa::openapi::schema::ObjectBuilder::new()
                    .title(Some("total"))
                    .schema_type(utoipa::openapi::SchemaType::Integer),
            )
            .property(
                "items",
                utoipa::openapi::schema::ArrayBuilder::new().items(item_schema),
            )
            .build();

        (
            "List",
            RefOr::T(utoipa::openapi::Schema::Object(list_schema)),
        )
    }
}

impl<T> List<T> {
    pub fn new(total: Option<usize>, items: Vec<T>) -> Self {
        Self { total, items }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> List<U> {
        List {
            total: self.total,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

impl<T> std::iter::IntoIterator for List<T> {
    type Item = T;

    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Used to paginate queries.
#[serde_as]
#[derive(Debug, Clone, Copy, Deserialize, Validate, utoipa::ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// The limit.
    #[serde_as(as = "DisplayFromStr")]
    #[validate(range(min = 1., max = 1000.))]
    pub per_page: usize,

    /// The page, starting from 1.
    #[serde_as(as = "DisplayFromStr")]
    #[validate(range(min = 1.))]
    pub page: usize,
}

impl Pagination {
    pub fn new(per_page: usize, page: usize) -> Self {
        Self { per_page, page }
    }

    /// Returns a tuple whose first element is the LIMIT and second
    /// the OFFSET for the query.
    pub fn to_limit_offset(&self) -> Result<(i64, i64), LockboxError> {
        let Self { page, per_page } = *self;

        let offset = page
            .saturating_sub(1)
            .checked_mul(per_page)
            .and_then(|offset| i64::try_from(offset).ok());

        match (i64::try_from(per_page).ok(), offset) {
            (Some(limit), Some(offset)) => Ok((limit, offset)),
            _ => err!(BadRequest, "page {page} of size {per_page} is out of range"),
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            per_page: 10,
            page: 1,
        }
    }
}
