//! Host-side helper: `cargo run` builds the WASM bundle into `static/pkg`
//! and serves `static/` locally. Pass a port as the first argument to
//! override the default 8000.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::process::{Command, Stdio};
    use std::{env, process};

    let port = env::args().nth(1).unwrap_or_else(|| "8000".to_owned());
    if port.parse::<u16>().is_err() {
        eprintln!("invalid port {port:?}");
        process::exit(2);
    }

    println!("Building WASM pkg …");
    match Command::new("wasm-pack")
        .args(["build", "--release", "--target", "web", "--out-dir", "static/pkg"])
        .status()
    {
        Ok(st) if st.success() => {}
        Ok(_) => {
            eprintln!("wasm-pack finished with errors. Ensure wasm-pack is installed (https://rustwasm.github.io/wasm-pack/).");
            process::exit(1);
        }
        Err(_) => {
            eprintln!("wasm-pack not found in PATH. Skipping wasm build; the site may serve stale artifacts.");
        }
    }

    println!("Serving static/ at http://127.0.0.1:{port} …");
    let status = Command::new("python3")
        .args(["-m", "http.server", &port, "--directory", "static"])
        .stdout(Stdio::null())
        .status();
    match status {
        Ok(st) if st.success() => {}
        Ok(st) => eprintln!("http server exited with {st}"),
        Err(e) => {
            eprintln!("failed to start http server: {e}");
            process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
