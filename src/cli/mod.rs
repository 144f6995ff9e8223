use self::{extract::Extract, info::Info};

mod extract;
mod info;

pub enum CliRes {
    NoCli,
    Ok,
    Err,
}

pub trait Cli {
    fn name(&self) -> &'static str;
    /// Each module has to handle the arguments by itself.
    fn cli(&self) -> CliRes;
    fn cli_help(&self);
}

pub fn cli() -> CliRes {
    let modules: &[&dyn Cli] = &[&Extract, &Info];

    let args: Vec<String> = std::env::args().collect();

    let help = || {
        println!(
            "\
styx

Available modules:"
        );
        for module in modules {
            println!("{}", module.name());
        }
    };

    if args.len() < 2 {
        help();
        return CliRes::NoCli;
    }

    for module in modules {
        if args[1] == module.name() {
            return module.cli();
        }
    }

    // In case nothing fits then prints this again.
    help();

    CliRes::NoCli
}
