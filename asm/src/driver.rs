//! Per-file orchestration: preprocess, two passes, artifact emission.

use std::fs;

use crate::context::Context;
use crate::error::{self, Diag, Error};
use crate::{firstpass, macros, output, secondpass};

#[derive(Debug, Default, Clone)]
pub struct Options {
    pub dump: bool,
}

/// Runs the whole pipeline for one source base name (`NAME` reads
/// `NAME.as`). Diagnostics are printed as they surface; any error skips
/// the remaining stages and no artifacts are written.
pub fn assemble(name: &str, opts: &Options) -> Result<(), Error> {
    let source_path = format!("{name}.as");
    let source =
        fs::read_to_string(&source_path).map_err(|e| Error::FileOpen(source_path.clone(), e))?;
    println!("  < {source_path}");

    // macro expansion; the derived text is what both passes consume
    let (expanded, diags) = macros::preprocess(&source);
    report(&source_path, &source, &diags);
    let am_path = format!("{name}.am");
    fs::write(&am_path, &expanded).map_err(|e| Error::FileCreate(am_path.clone(), e))?;
    println!("  > {am_path}");
    if error::has_errors(&diags) {
        return Err(Error::Failed(source_path));
    }

    let mut ctx = Context::new();

    let diags = firstpass::first_pass(&expanded, &mut ctx);
    report(&am_path, &expanded, &diags);
    if error::has_errors(&diags) {
        return Err(Error::Failed(source_path));
    }

    let diags = secondpass::second_pass(&expanded, &mut ctx);
    report(&am_path, &expanded, &diags);
    if error::has_errors(&diags) {
        return Err(Error::Failed(source_path));
    }

    ctx.shift_data_words();

    if let Some(text) = output::render_ext(&ctx) {
        write_artifact(format!("{name}.ext"), &text)?;
    }
    if let Some(text) = output::render_ent(&ctx) {
        write_artifact(format!("{name}.ent"), &text)?;
    }
    write_artifact(format!("{name}.ob"), &output::render_ob(&ctx))?;

    if opts.dump {
        output::print_listing(&ctx);
    }
    Ok(())
}

fn write_artifact(path: String, text: &str) -> Result<(), Error> {
    println!("  > {path}");
    fs::write(&path, text).map_err(|e| Error::FileCreate(path.clone(), e))
}

fn report(path: &str, text: &str, diags: &[Diag]) {
    let lines: Vec<&str> = text.lines().collect();
    for diag in diags {
        diag.print(path, &lines);
    }
}
