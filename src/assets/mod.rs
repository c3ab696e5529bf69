pub(crate) mod color;
pub(crate) mod scratch;
pub(crate) mod svg_import;
