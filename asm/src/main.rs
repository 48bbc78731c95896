use color_print::ceprintln;

use asm::driver;

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(version, about = "Two-pass assembler", help_template = HELP_TEMPLATE)]
struct Args {
    /// Source base names; `NAME` assembles `NAME.as`
    input: Vec<String>,

    /// Dump the assembled image to the terminal
    #[clap(short, long)]
    dump: bool,
}

fn main() {
    use clap::Parser;

    let args: Args = Args::parse();
    if args.input.is_empty() {
        println!("Usage: assembler NAME1 [NAME2 ...]  (assembles NAME.as)");
        return;
    }

    let opts = driver::Options { dump: args.dump };
    for name in &args.input {
        println!("Assembling {name}");
        if let Err(err) = driver::assemble(name, &opts) {
            ceprintln!("<red,bold>error</>: {}", err);
        }
    }
}
