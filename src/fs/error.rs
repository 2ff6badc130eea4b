use thiserror::Error;

/// every reason a filesystem operation can fail
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    #[error("no free block left")]
    OutOfSpace,
    #[error("no such file or folder")]
    NotFound,
    #[error("parent folder not found")]
    ParentNotFound,
    #[error("parent is a file")]
    ParentIsFile,
    #[error("folder is not empty")]
    NotEmpty,
    #[error("permission denied")]
    PermissionDenied,
    #[error("invalid node")]
    InvalidNode,
    #[error("block chain is corrupt")]
    ChainCorrupt,
    #[error("file has no data block")]
    EmptyFile,
    #[error("name already exists in this folder")]
    AlreadyExists,
    #[error("invalid name")]
    InvalidName,
    #[error("not a file")]
    NotAFile,
    #[error("not a folder")]
    NotAFolder,
}

/// status code reported for a successful operation
pub const STATUS_OK: u8 = 0;

impl FsError {
    /// stable, positive status code of this error
    pub const fn code(&self) -> u8 {
        match self {
            FsError::OutOfSpace => 1,
            FsError::NotFound => 2,
            FsError::ParentNotFound => 3,
            FsError::ParentIsFile => 4,
            FsError::NotEmpty => 5,
            FsError::PermissionDenied => 6,
            FsError::InvalidNode => 7,
            FsError::ChainCorrupt => 8,
            FsError::EmptyFile => 9,
            FsError::AlreadyExists => 10,
            FsError::InvalidName => 11,
            FsError::NotAFile => 12,
            FsError::NotAFolder => 13,
        }
    }
}

/// collapse an operation result into a status code, `0` on success
pub fn status<T>(result: &Result<T, FsError>) -> u8 {
    match result {
        Ok(_) => STATUS_OK,
        Err(e) => e.code(),
    }
}

pub type FsResult<T> = Result<T, FsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_positive_and_unique() {
        let all = [
            FsError::OutOfSpace,
            FsError::NotFound,
            FsError::ParentNotFound,
            FsError::ParentIsFile,
            FsError::NotEmpty,
            FsError::PermissionDenied,
            FsError::InvalidNode,
            FsError::ChainCorrupt,
            FsError::EmptyFile,
            FsError::AlreadyExists,
            FsError::InvalidName,
            FsError::NotAFile,
            FsError::NotAFolder,
        ];
        let mut codes: Vec<u8> = all.iter().map(FsError::code).collect();
        assert!(codes.iter().all(|c| *c != STATUS_OK));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_status() {
        assert_eq!(status(&Ok::<(), FsError>(())), 0);
        assert_eq!(status(&Err::<(), _>(FsError::NotEmpty)), 5);
    }
}
