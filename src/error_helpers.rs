//! Error helper functions for creating actionable I/O error messages

use std::io;
use std::path::Path;

/// Check if an IO error is a permission denied error
pub fn is_permission_denied(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::PermissionDenied
}

/// Check if an IO error is a "not found" error
pub fn is_not_found(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::NotFound
}

/// Message for a target folder that cannot be walked
pub fn folder_error(path: &Path, underlying_err: &io::Error) -> String {
    let base = format!("Cannot read folder: '{}'", path.display());

    if is_not_found(underlying_err) {
        format!(
            "{}\n\n\
             Cause: The folder does not exist\n\n\
             Possible fixes:\n\
             1. Check the path is spelled correctly\n\
             2. Use an absolute path if the relative path is ambiguous",
            base
        )
    } else if is_permission_denied(underlying_err) {
        format!(
            "{}\n\n\
             Cause: Permission denied\n\n\
             Possible fixes:\n\
             1. Check folder permissions: ls -ld '{}'\n\
             2. Ensure read and execute access with: chmod u+rx '{}'",
            base,
            path.display(),
            path.display()
        )
    } else {
        format!("{}\n\nUnderlying error: {}", base, underlying_err)
    }
}

/// Message for a file that cannot be read or rewritten
pub fn file_error(path: &Path, operation: &str, underlying_err: &io::Error) -> String {
    if is_permission_denied(underlying_err) {
        let parent_dir = path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ".".to_string());

        format!(
            "Permission denied when {} '{}'\n\n\
             Possible fixes:\n\
             1. Check file permissions: ls -l '{}'\n\
             2. Ensure write access to the file and its folder: chmod u+w '{}'",
            operation,
            path.display(),
            path.display(),
            parent_dir
        )
    } else {
        format!(
            "Failed {} '{}': {}",
            operation,
            path.display(),
            underlying_err
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_is_permission_denied() {
        let perm_err = io::Error::new(ErrorKind::PermissionDenied, "access denied");
        assert!(is_permission_denied(&perm_err));

        let not_found_err = io::Error::new(ErrorKind::NotFound, "not found");
        assert!(!is_permission_denied(&not_found_err));
    }

    #[test]
    fn test_folder_error_not_found() {
        let err = io::Error::new(ErrorKind::NotFound, "not found");
        let msg = folder_error(Path::new("/no/such/dir"), &err);
        assert!(msg.contains("/no/such/dir"));
        assert!(msg.contains("does not exist"));
    }

    #[test]
    fn test_file_error_permission() {
        let err = io::Error::new(ErrorKind::PermissionDenied, "access denied");
        let msg = file_error(Path::new("/tmp/test.txt"), "writing", &err);
        assert!(msg.contains("Permission denied when writing"));
        assert!(msg.contains("Possible fixes"));
    }

    #[test]
    fn test_file_error_other() {
        let err = io::Error::other("disk on fire");
        let msg = file_error(Path::new("/tmp/test.txt"), "reading", &err);
        assert_eq!(msg, "Failed reading '/tmp/test.txt': disk on fire");
    }
}
