use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    /// A required element is not on the page. Disables one component.
    #[error("missing element: {0}")]
    MissingElement(String),
    #[error("javascript error: {0}")]
    Js(String),
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    ConfigInvalid(String),
}

impl Error {
    /// Whether this only means "the page doesn't use this component".
    pub fn is_absent_markup(&self) -> bool {
        matches!(self, Error::MissingElement(_))
    }
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        Error::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_element_is_absent_markup() {
        assert!(Error::MissingElement("viewerCount".into()).is_absent_markup());
        assert!(!Error::ConfigInvalid("x".into()).is_absent_markup());
        assert!(!Error::NoDocument.is_absent_markup());
    }

    #[test]
    fn display_names_the_element() {
        let e = Error::MissingElement("modalPopup".into());
        assert_eq!(e.to_string(), "missing element: modalPopup");
    }

    #[test]
    fn serde_error_converts() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let e: Error = err.into();
        assert!(e.to_string().starts_with("config parse error"));
    }
}
