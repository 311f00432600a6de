use crate::error::{Error, ErrorKind};

impl From<tokio_postgres::error::Error> for Error {
    fn from(e: tokio_postgres::error::Error) -> Error {
        let code = e.code().map(|c| c.code().to_owned());
        let message = e.as_db_error().map(|db_error| db_error.message().to_owned());

        let mut builder = Error::builder(ErrorKind::QueryError(Box::new(e)));

        if let Some(code) = code {
            builder.set_original_code(code);
        }

        if let Some(message) = message {
            builder.set_original_message(message);
        }

        builder.build()
    }
}
