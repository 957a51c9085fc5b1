use anyhow::{anyhow, Result};

/// Remove a bare flag from args, returning whether it was present.
pub fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    if let Some(pos) = args.iter().position(|a| a == flag) {
        args.remove(pos);
        true
    } else {
        false
    }
}

/// Remove `flag value` from args, returning the value. A flag given as the
/// last argument with nothing after it is an error, not a silent no-op.
pub fn take_flag_value(args: &mut Vec<String>, flag: &str) -> Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };

    if pos + 1 >= args.len() {
        return Err(anyhow!("{} requires a value", flag));
    }

    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(value))
}
