use actix_web_csp_compiler::{negotiate, CspConfig};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);

    let Some(path) = args.next() else {
        eprintln!("usage: actix_web_csp_compiler <policy.json> [user-agent]");
        return ExitCode::from(2);
    };
    let user_agent = args.next();

    let config = match CspConfig::from_file(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    let headers = match config.store().headers(&negotiate(user_agent.as_deref())) {
        Ok(headers) => headers,
        Err(e) => {
            eprintln!("{}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    if headers.is_empty() {
        println!("{}: policy is empty, no header would be sent", path);
    }
    for (name, value) in headers {
        println!("{}: {}", name, value.to_str().unwrap_or_default());
    }

    ExitCode::SUCCESS
}
