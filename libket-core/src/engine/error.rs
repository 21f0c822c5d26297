use thiserror::Error;

pub type KetResult<T> = Result<T, KetError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KetError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{what} index {index} out of range for size {size}")]
    OutOfRange {
        what: &'static str,
        index: usize,
        size: usize,
    },

    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("scheduler queue full ({capacity} tasks pending)")]
    QueueFull { capacity: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = KetError::OutOfRange {
            what: "qubit",
            index: 5,
            size: 3,
        };
        let text = err.to_string();
        assert!(text.contains("qubit"));
        assert!(text.contains('5'));
        assert!(text.contains('3'));

        assert!(KetError::QueueFull { capacity: 128 }
            .to_string()
            .contains("128"));
    }
}
