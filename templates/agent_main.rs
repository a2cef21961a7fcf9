//! Agent runtime host.
//!
//! agenticc splices a C program and a model name into this file and builds it.
//! At runtime the program asks an OpenAI-compatible endpoint to behave as the
//! compiled C program would, given the command-line arguments and stdin.
//!
//! agenticc-slots: v1

use std::io::{IsTerminal, Read};
use std::process::ExitCode;

const CODE_REGION_LEN: usize = 32 * 1024;
const MODEL_REGION_LEN: usize = 128;

const fn reserve<const N: usize>(marker: &[u8], fill: u8) -> [u8; N] {
    let mut region = [fill; N];
    let mut i = 0;
    while i < marker.len() {
        region[i] = marker[i];
        i += 1;
    }
    region
}

// Patchable regions for builds that are specialized after compilation.
#[used]
static CODE_REGION: [u8; CODE_REGION_LEN] = reserve(b"AGENTICC_CODE_MARKER_START_", b'X');
#[used]
static MODEL_REGION: [u8; MODEL_REGION_LEN] = reserve(b"AGENTICC_MODEL_MARKER_", b'Y');

/// Reads a patched region up to its first NUL byte.
///
/// An unpatched region still ends with its fill byte.
fn region_text(region: &'static [u8], fill: u8) -> Option<String> {
    let region = std::hint::black_box(region);
    if region.last() == Some(&fill) {
        return None;
    }
    let end = region.iter().position(|&b| b == 0).unwrap_or(region.len());
    Some(String::from_utf8_lossy(&region[..end]).into_owned())
}

fn is_placeholder(value: &str, fill: char, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c == fill)
}

fn main() -> ExitCode {
    let embedded_code: &str = &"X".repeat(CODE_REGION_LEN);
    let model_name: &str = &"Y".repeat(MODEL_REGION_LEN);

    let code = if is_placeholder(embedded_code, 'X', CODE_REGION_LEN) {
        region_text(&CODE_REGION, b'X')
    } else {
        Some(embedded_code.to_string())
    };
    let model = if is_placeholder(model_name, 'Y', MODEL_REGION_LEN) {
        region_text(&MODEL_REGION, b'Y')
    } else {
        Some(model_name.to_string())
    };

    let (Some(code), Some(model)) = (code, model) else {
        eprintln!("error: this binary has not been specialized with a program");
        return ExitCode::from(2);
    };

    let api_key = match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!("error: OPENAI_API_KEY is not set");
            return ExitCode::from(2);
        }
    };
    let base_url = std::env::var("OPENAI_BASE_URL")
        .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut stdin = String::new();
    if !std::io::stdin().is_terminal() {
        let _ = std::io::stdin().read_to_string(&mut stdin);
    }

    let prompt = format!(
        "Program source:\n```c\n{code}\n```\n\nArguments: {args:?}\n\nStandard input:\n{stdin}"
    );
    let body = ureq::json!({
        "model": model,
        "messages": [
            {
                "role": "system",
                "content": "You are the compiled form of the C program you are given. \
                            Respond with exactly the bytes the program would write to \
                            standard output for the given arguments and input, and nothing else."
            },
            { "role": "user", "content": prompt }
        ]
    });

    let response = ureq::post(&format!("{}/chat/completions", base_url.trim_end_matches('/')))
        .set("Authorization", &format!("Bearer {api_key}"))
        .send_json(body);

    let reply: ureq::SerdeValue = match response {
        Ok(response) => match response.into_json() {
            Ok(value) => value,
            Err(err) => {
                eprintln!("error: unreadable model response: {err}");
                return ExitCode::FAILURE;
            }
        },
        Err(err) => {
            eprintln!("error: model request failed: {err}");
            return ExitCode::FAILURE;
        }
    };

    match reply["choices"][0]["message"]["content"].as_str() {
        Some(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("error: unexpected model response: {reply}");
            ExitCode::FAILURE
        }
    }
}
