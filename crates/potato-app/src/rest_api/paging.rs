use potato_dal::Batch;
use serde::Serialize;

/// Page envelope, `number` is zero based.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    content: Vec<T>,
    number: u32,
    size: u32,
    total_elements: u64,
    total_pages: u32,
    number_of_elements: u32,
    first: bool,
    last: bool,
    empty: bool,
}

impl<T> Page<T>
where
    T: Serialize,
{
    pub fn try_from_batch(
        batch: Batch<T>,
        number: u32,
        page_size: u32,
    ) -> Result<Self, std::num::TryFromIntError> {
        let page_size = page_size.max(1);
        let total_pages =
            u32::try_from((batch.total + page_size as u64 - 1) / page_size as u64)?;
        let number_of_elements = u32::try_from(batch.rows.len())?;
        Ok(Self {
            number,
            size: page_size,
            total_elements: batch.total,
            total_pages,
            number_of_elements,
            first: number == 0,
            last: number.saturating_add(1) >= total_pages,
            empty: batch.rows.is_empty(),
            content: batch.rows,
        })
    }
}
