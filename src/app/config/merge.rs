/// Take `file` when `current` still holds the built-in default.
///
/// Command-line and environment values always win over the config file.
pub fn merge_field<T: PartialEq>(current: &mut T, file: T, default: &T) {
    if current == default && file != *default {
        *current = file;
    }
}
