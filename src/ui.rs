// UI layer: provides a simple interactive menu using `dialoguer`.
// The functions are small and synchronous to make the flow easy to follow.

use crate::api::{self, ApiClient, ComponentTweak, FlowRunRequest};
use anyhow::Result;
use dialoguer::{Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Main interactive menu. Receives an `ApiClient` instance and runs a
/// simple select loop until the user chooses "Exit".
///
/// Note: `Select::interact()` is keyboard-driven: you can use arrow keys
/// and Enter to choose an option.
pub fn main_menu(mut api: ApiClient) -> Result<()> {
    // Pick up an API key persisted by a previous session, so uploads to a
    // key-protected server work without re-entering it every run.
    if !api.has_api_key() {
        if let Ok(key) = load_api_key() {
            api.set_api_key(key.trim());
        }
    }

    loop {
        let items = vec![
            "Upload a file",
            "Upload a file to a flow",
            "Upload and run a flow",
            "Set API key",
            "Exit",
        ];
        // `Select` shows a keyboard-navigable list in the terminal.
        let selection = Select::new().items(&items).default(0).interact()?;
        match selection {
            0 => {
                // Plain upload to the V2 files endpoint; prints the
                // server's reply verbatim.
                handle_upload(&api)?;
            }
            1 => {
                // Same upload, but scoped to one flow via the V1 endpoint.
                handle_flow_upload(&api)?;
            }
            2 => {
                // The two-step demo flow: upload, then run a flow with the
                // stored path wired into its file component.
                handle_upload_and_run(&api)?;
            }
            3 => {
                // `Password` hides the key while typing. Persist it to
                // disk so the next run can reuse it.
                let key: String = Password::new().with_prompt("Langflow API key").interact()?;
                api.set_api_key(&key);
                persist_api_key(&key)?;
            }
            4 => break,
            _ => {}
        }
    }
    Ok(())
}

/// Prompt for a file, upload it to the V2 files endpoint and print the
/// response body exactly as received, success or failure alike.
fn handle_upload(api: &ApiClient) -> Result<()> {
    let (path, filename, content_type) = match prompt_file()? {
        Some(file) => file,
        None => return Ok(()),
    };

    // indicatif's spinner gives simple feedback while the blocking call
    // is in flight.
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message("Uploading...");
    thread::sleep(Duration::from_millis(300));

    match api.upload_user_file(&path, &filename, &content_type) {
        Ok(resp) => println!("{}", resp.body),
        Err(e) => println!("Upload failed: {}", e),
    }
    Ok(())
}

/// Prompt for a flow id and a file, then upload via the V1 flow-scoped
/// endpoint.
fn handle_flow_upload(api: &ApiClient) -> Result<()> {
    let flow_id: String = Input::new().with_prompt("Flow id").interact_text()?;
    let (path, filename, content_type) = match prompt_file()? {
        Some(file) => file,
        None => return Ok(()),
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message("Uploading...");
    thread::sleep(Duration::from_millis(300));

    match api.upload_flow_file(&flow_id, &path, &filename, &content_type) {
        Ok(resp) => println!("{}", resp.body),
        Err(e) => println!("Upload failed: {}", e),
    }
    Ok(())
}

/// Upload a file, pull the stored path out of the upload response, then
/// run a flow with that path tweaked into its file component and print
/// the assistant's message.
fn handle_upload_and_run(api: &ApiClient) -> Result<()> {
    let (path, filename, content_type) = match prompt_file()? {
        Some(file) => file,
        None => return Ok(()),
    };
    let flow_id: String = Input::new().with_prompt("Flow id").interact_text()?;
    let component: String = Input::new()
        .with_prompt("File component name (e.g. File-VMznN)")
        .interact_text()?;
    let text: String = Input::new()
        .with_prompt("Prompt (leave empty for none)")
        .allow_empty(true)
        .interact_text()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message("Uploading...");
    thread::sleep(Duration::from_millis(300));

    let uploaded = match api.upload_user_file(&path, &filename, &content_type) {
        Ok(resp) => resp,
        Err(e) => {
            println!("Upload failed: {}", e);
            return Ok(());
        }
    };
    println!("{}", uploaded.body);

    // The run payload needs the server-side path from the upload response,
    // so this flow is the one place the body gets parsed as JSON.
    let body: serde_json::Value = match serde_json::from_str(&uploaded.body) {
        Ok(value) => value,
        Err(_) => {
            println!("Upload response was not JSON; cannot run the flow.");
            return Ok(());
        }
    };
    let stored = match api::uploaded_file_path(&body) {
        Some(path) => path,
        None => {
            println!("Upload response carried no file path; cannot run the flow.");
            return Ok(());
        }
    };

    let mut request = FlowRunRequest::default();
    if !text.is_empty() {
        request.input_value = Some(text);
    }
    request.tweaks.insert(
        component,
        ComponentTweak {
            path: Some(stored),
            ..Default::default()
        },
    );

    spinner.set_message("Running flow...");
    match api.run_flow(&flow_id, &request) {
        Ok(resp) => {
            let parsed: serde_json::Value =
                serde_json::from_str(&resp.body).unwrap_or(serde_json::Value::Null);
            match api::extract_message(&parsed) {
                Some(message) => println!("{}", message),
                // Fall back to the raw body when the response does not
                // carry a chat message at the expected spot.
                None => println!("{}", resp.body),
            }
        }
        Err(e) => println!("Flow run failed: {}", e),
    }
    Ok(())
}

/// Ask for a local path and a content type to declare on the upload.
///
/// The declared type defaults to `application/octet-stream` like the
/// original example; the allow-list check runs against the type detected
/// from the file extension instead, mirroring where the demo backend
/// enforces it. Returns `None` when the detected type is not allowed.
fn prompt_file() -> Result<Option<(PathBuf, String, String)>> {
    let path: String = Input::new().with_prompt("File path").interact_text()?;
    let path = PathBuf::from(path);
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("upload.bin")
        .to_string();

    let detected = mime_guess::from_path(&path)
        .first_raw()
        .unwrap_or("application/octet-stream");
    if !api::is_allowed_mime(detected) {
        println!(
            "Unsupported file type {}. Allowed types: {}",
            detected,
            api::ALLOWED_MIME_TYPES.join(", ")
        );
        return Ok(None);
    }

    let content_type: String = Input::new()
        .with_prompt("Content type")
        .default("application/octet-stream".to_string())
        .interact_text()?;

    Ok(Some((path, filename, content_type)))
}

/// Persist the API key into a file in the user's home directory.
fn persist_api_key(key: &str) -> Result<()> {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(".flowup_api_key");
    std::fs::write(path, key)?;
    Ok(())
}

/// Load the API key from the user's home directory file.
fn load_api_key() -> Result<String> {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(".flowup_api_key");
    let data = std::fs::read_to_string(path)?;
    Ok(data)
}
