pub type BakeResult<T> = Result<T, BakeError>;

#[derive(thiserror::Error, Debug)]
pub enum BakeError {
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    #[error("unsupported paint: {0}")]
    UnsupportedPaint(String),

    #[error("unsupported painter: {0}")]
    UnsupportedPainter(String),

    #[error("unsupported composite rule: {0}")]
    UnsupportedCompositeRule(String),

    #[error("invalid gradient: {0}")]
    InvalidGradient(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BakeError {
    pub fn unsupported_geometry(kind: impl Into<String>) -> Self {
        Self::UnsupportedGeometry(kind.into())
    }

    pub fn unsupported_paint(kind: impl Into<String>) -> Self {
        Self::UnsupportedPaint(kind.into())
    }

    pub fn unsupported_painter(kind: impl Into<String>) -> Self {
        Self::UnsupportedPainter(kind.into())
    }

    pub fn unsupported_composite_rule(kind: impl Into<String>) -> Self {
        Self::UnsupportedCompositeRule(kind.into())
    }

    pub fn invalid_gradient(msg: impl Into<String>) -> Self {
        Self::InvalidGradient(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            BakeError::unsupported_paint("pattern")
                .to_string()
                .contains("unsupported paint:")
        );
        assert!(
            BakeError::unsupported_composite_rule("Multiply")
                .to_string()
                .contains("unsupported composite rule:")
        );
        assert!(
            BakeError::invalid_gradient("x")
                .to_string()
                .contains("invalid gradient:")
        );
        assert!(BakeError::parse("x").to_string().contains("parse error:"));
    }

    #[test]
    fn errors_carry_the_offending_kind() {
        let err = BakeError::unsupported_geometry("image");
        assert!(err.to_string().contains("image"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = BakeError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
