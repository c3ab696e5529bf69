pub(crate) mod bound_box;
pub(crate) mod connector;
pub(crate) mod repeat;
