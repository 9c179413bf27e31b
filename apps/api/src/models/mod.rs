pub mod candidate;
pub mod job;
pub mod ranking;

/// Years columns are plain INTEGER; negative values are treated as unknown.
pub(crate) fn non_negative_years(value: Option<i32>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}
