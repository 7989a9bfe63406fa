// Copyright (C) 2020-2024 Andy Kurnia.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    // bad rack, bad board, bad tile symbol. reported before any search.
    InvalidInput,
    Io,
    Parse,
}

pub struct MyError {
    kind: ErrorKind,
    s: String,
}

impl MyError {
    #[inline(always)]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl std::fmt::Display for MyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.s)
    }
}

impl std::fmt::Debug for MyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.s)
    }
}

impl std::error::Error for MyError {}

pub fn new(s: String) -> MyError {
    MyError {
        kind: ErrorKind::InvalidInput,
        s,
    }
}

pub fn with_kind(kind: ErrorKind, s: String) -> MyError {
    MyError { kind, s }
}

pub type BoxAnyError = Box<dyn std::error::Error + Send + Sync>;
pub type Returns<T> = Result<T, BoxAnyError>;

// true iff err is a MyError of the given kind.
pub fn is_kind(err: &BoxAnyError, kind: ErrorKind) -> bool {
    err.downcast_ref::<MyError>()
        .is_some_and(|e| e.kind() == kind)
}

#[macro_export]
macro_rules! return_error {
    ($error:expr) => {
        return Err($crate::error::new($error).into());
    };
}
