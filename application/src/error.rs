//! [`Error`]-related definitions.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::infra::database;
use tracerr::{Trace, Traced};

/// Defines a new enum of API errors convertible into an [`Error`].
///
/// Every variant carries its GraphQL error `code`, the HTTP `status` of the
/// response and a human-readable `message`.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// API error kinds.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                let (code, status_code) = match err {
                    $( $name::$variant => (
                        $code,
                        ::http::StatusCode::$status_code,
                    ), )*
                };
                Self::new(code, status_code, err.to_string())
            }
        }
    };
}

/// GraphQL API [`Error`], exposed to clients with its [`Code`] and
/// backtrace in the `extensions`.
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of the response this [`Error`] ends up in.
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`], if traced.
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// Creates a new untraced [`Error`].
    #[must_use]
    pub fn new(
        code: Code,
        status_code: http::StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            status_code,
            backtrace: None,
            message: message.into(),
        }
    }

    /// Creates a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self::new(
            "INTERNAL_SERVER_ERROR",
            http::StatusCode::INTERNAL_SERVER_ERROR,
            msg.to_string(),
        )
    }

    /// Replaces the message of this [`Error`] with a more detailed one.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.code, self.message)?;
        if let Some(trace) = &self.backtrace {
            write!(
                f,
                "\n{}",
                trace.iter().format_with("\n", |frame, f| {
                    f(&format_args!("{frame}"))
                }),
            )?;
        }
        Ok(())
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let backtrace = self
            .backtrace
            .iter()
            .flat_map(|trace| trace.iter())
            .map(|frame| juniper::Value::scalar(frame.to_string()))
            .collect();

        let mut ext = juniper::Object::with_capacity(2);
        drop(ext.add_field("code", juniper::Value::scalar(self.code.to_owned())));
        drop(ext.add_field("backtrace", juniper::Value::list(backtrace)));
        juniper::FieldError::new(self.message, juniper::Value::object(ext))
    }
}

/// [`Error`] code, like `BLOCK_NOT_EXISTS`.
pub type Code = &'static str;

/// Conversion of internal errors into API [`Error`]s.
pub trait AsError {
    /// Tries to convert this error into an [`Error`].
    ///
    /// [`None`] means the error is not meant for clients, so it's exposed as
    /// an internal one.
    fn try_as_error(&self) -> Option<Error>;

    /// Converts this error into an [`Error`], falling back to an internal one.
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error().unwrap_or_else(|| {
            tracing::error!("{self}");
            Error::internal(&self)
        })
    }

    /// Converts this error into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}
