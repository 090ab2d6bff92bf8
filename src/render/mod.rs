pub(crate) mod backend;
pub(crate) mod delegates;
pub(crate) mod visual;
