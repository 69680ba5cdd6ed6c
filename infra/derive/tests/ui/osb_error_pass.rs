use osb_derive::osb_error;
use std::borrow::Cow;

#[osb_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Missing {id}{}", format_context(.context))]
    Missing { id: String, context: Option<std::borrow::Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    Err(std::io::Error::other("disk gone")).context("reading catalog")
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.to_string(), "IO error (reading catalog): disk gone");

    let err: DemoError = "boom".into();
    assert_eq!(err.to_string(), "Internal error: boom");

    let err: Result<(), DemoError> = Err(DemoError::Missing { id: "b1".to_owned(), context: None });
    let err = err.context("get-binding").unwrap_err();
    assert_eq!(err.to_string(), "Missing b1 (get-binding)");
}
