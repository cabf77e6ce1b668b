#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("This handle is already in the index; remove it before adding it again")]
    AlreadyExists,

    #[error("This handle was never added to the index, or has already been removed")]
    UnknownObject,

    #[error("Boxes must have a finite origin and a strictly positive width and height, got w={w} h={h}")]
    InvalidDimensions { w: f64, h: f64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
