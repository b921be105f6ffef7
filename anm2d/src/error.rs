use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unexpected end of input at offset {offset}")]
    TruncatedInput { offset: usize },

    #[error("string without a terminator at offset {offset}")]
    UnterminatedString { offset: usize },

    #[error("id {id} resolves to no sprite or shape")]
    UnresolvedId { id: i32 },

    #[error("unrecognised frame opcode {opcode}")]
    MissingTransform { opcode: u32 },

    #[error("invalid value: {message}")]
    InvalidValue { message: String },
}
