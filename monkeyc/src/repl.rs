use std::io::Write;

use monkey_core::{
	eval::Evaluator,
	parser::prelude::parse_program,
	utils::prelude::Error
};

const PROMPT: &str = ">> ";

pub fn start() -> std::io::Result<()> {
	let stdin = std::io::stdin();

	let _ = ctrlc::set_handler(|| {
		println!("\nGoodbye!");
		std::process::exit(0);
	});

	println!("Hello! This is the Monkey programming language!");
	println!("Feel free to type in commands");

	let mut evaluator = Evaluator::new();

	loop {
		let mut input = String::from("");

		print!("{}", PROMPT);
		std::io::stdout().flush()?;

		if stdin.read_line(&mut input)? == 0 {
			println!("Goodbye!");
			return Ok(());
		}

		if let Some('\n') = input.chars().next_back() {
			input.pop();
		}
		if let Some('\r') = input.chars().next_back() {
			input.pop();
		}

		match input.as_str() {
			"" => {},
			"exit" => {
				println!("Goodbye!");
				return Ok(());
			},
			_ => {
				let parsed = parse_program(&input);

				if !parsed.errors.is_empty() {
					let error = Error::Parse {
						path: "repl".into(),
						src: input.clone(),
						errors: parsed.errors
					};

					let buf_writer = crate::cli::stderr_buffer_writer();
					let mut buf = buf_writer.buffer();

					error.pretty(&mut buf);
					buf_writer.print(&buf)?;

					continue;
				}

				println!("{}", evaluator.eval_program(parsed.program));
			}
		}
	}
}
