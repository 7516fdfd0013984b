// Entrypoint for the CLI application.
// - Keeps `main` small: create an API client and hand it to the UI loop.
// - Returns `anyhow::Result` so any `ApiError` escaping the menu exits
//   non-zero with a diagnostic.

use flowup_cli::{ui::main_menu, api::ApiClient};

fn main() -> anyhow::Result<()> {
    // Create API client configured by the environment variables
    // `LANGFLOW_URL` and `LANGFLOW_API_KEY`, or default to the local
    // Langflow instance at http://127.0.0.1:7860. See `api::ApiClient::from_env`.
    let api = ApiClient::from_env()?;

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(api)?;
    Ok(())
}
