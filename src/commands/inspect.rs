use crate::api::{JsonVizError, inspect};
use crate::cli::InspectArgs;
use crate::fs::{FileSystem, default_fs};
use crate::resolver::ResolveError;
use crate::style;

use super::read_input;

pub fn cmd_inspect(args: InspectArgs) -> i32 {
    cmd_inspect_with_fs(args, default_fs())
}

pub fn cmd_inspect_with_fs(args: InspectArgs, fs: &dyn FileSystem) -> i32 {
    let text = match read_input(fs, &args.file) {
        Ok(text) => text,
        Err(code) => return code,
    };

    match inspect(&text, &args.label) {
        Ok(resolved) => {
            style::header(&resolved.key);
            println!("{}", resolved.to_pretty());
            0
        }
        Err(JsonVizError::Resolve(ResolveError::InvalidJson(e))) => {
            style::error(&format!("Input is not valid JSON: {}", e));
            1
        }
        Err(e) => {
            style::error(&format!("Could not find data for '{}'", args.label));
            style::hint(&e.to_string());
            style::hint("Labels look like \"Root\", \"address\" or \"employees > 0 > skills\"");
            1
        }
    }
}
