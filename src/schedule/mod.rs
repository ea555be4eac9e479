pub(crate) mod manifest;
pub(crate) mod model;
pub(crate) mod time;
