/// Errors from the edges of the crate: configuration, pillar strings and still export.
///
/// Nothing on the render path returns these; palette, geometry and raster code degrade
/// to neutral output instead.
#[derive(Debug, thiserror::Error)]
pub enum GemError {
    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot allocate a {0}x{0} pixel surface")]
    Surface(u32),

    #[error("invalid pillar `{0}`: expected a stem symbol followed by a branch symbol")]
    InvalidPillar(String),
}
