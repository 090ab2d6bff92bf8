pub(crate) mod derived;
pub(crate) mod geometry;
pub(crate) mod observable;
pub(crate) mod parameter;
pub(crate) mod polygon;
