//! Binary array container
//!
//! A dataset is persisted as a single zip archive in the NumPy `.npz` layout:
//! every array is an `{entry}.npy` member, so `numpy.load` can open the file
//! directly. Parameter attribute groups are stored next to them as
//! `param{i}_info.json` members holding `name`, `description`, `range_min`
//! and `range_max`.
//!
//! Entries: `xi`, `nm` (optional), `r_values`, `m_values` (with `nm`),
//! `param{i}` per swept parameter and `param{i}_info` (optional).

mod reader;
mod writer;

pub use reader::{RawContainer, read_dataset};
pub use writer::write_dataset;

pub(crate) const NAME_ATTR: &str = "name";
pub(crate) const DESCRIPTION_ATTR: &str = "description";
pub(crate) const RANGE_MIN_ATTR: &str = "range_min";
pub(crate) const RANGE_MAX_ATTR: &str = "range_max";

pub(crate) const ARRAY_SUFFIX: &str = ".npy";
pub(crate) const ATTRIBUTE_SUFFIX: &str = ".json";

pub(crate) fn array_member(entry: &str) -> String {
    format!("{entry}{ARRAY_SUFFIX}")
}

pub(crate) fn attribute_member(entry: &str) -> String {
    format!("{entry}{ATTRIBUTE_SUFFIX}")
}
