#![allow(non_snake_case)]
use RustedDoubleQuad::Examples::double_integral_examples::run_example;
use RustedDoubleQuad::Utils::logger::{LogSettings, init_logger};
use RustedDoubleQuad::Utils::task_parser::IntegrationTask;
use tabled::Table;
use tabled::settings::Style;

fn main() {
    // a task file given on the command line is solved, otherwise an example is run
    if let Some(path) = std::env::args().nth(1) {
        let task = match IntegrationTask::from_file(&path) {
            Ok(task) => task,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        };
        init_logger(task.logging.as_ref().unwrap_or(&LogSettings::default()));
        match task.solve() {
            Ok(result) => {
                let mut table = Table::new(&result.steps);
                table.with(Style::modern_rounded());
                println!("{}", table);
            }
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        }
        return;
    }
    init_logger(&LogSettings::default());
    // 0: preset table, 1: triangle, 2: Gaussian over the plane, 3: unit disc,
    // 4: forced Simpson, 5: expression language
    let example = 1;
    run_example(example);
}
