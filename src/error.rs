use std::fmt;

#[derive(Debug)]
pub enum BoxPressError {
    InvalidColorFormat(String),
    InvalidConfiguration(String),
    MissingRootElement(String),
    Layout(taffy::TaffyError),
    Io(std::io::Error),
}

impl fmt::Display for BoxPressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxPressError::InvalidColorFormat(value) => {
                write!(f, "invalid color format: {}", value)
            }
            BoxPressError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {}", message)
            }
            BoxPressError::MissingRootElement(id) => {
                write!(f, "no element with id '{}' in source markup", id)
            }
            BoxPressError::Layout(err) => write!(f, "layout error: {}", err),
            BoxPressError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for BoxPressError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BoxPressError::Layout(err) => Some(err),
            BoxPressError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BoxPressError {
    fn from(value: std::io::Error) -> Self {
        BoxPressError::Io(value)
    }
}

impl From<taffy::TaffyError> for BoxPressError {
    fn from(value: taffy::TaffyError) -> Self {
        BoxPressError::Layout(value)
    }
}
