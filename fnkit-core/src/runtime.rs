// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Local handler execution.
//!
//! The handler runs in a child interpreter started with a small bootstrap
//! script. The payload is written to the child's stdin and the handler's
//! return value comes back as JSON on stdout. Anything the handler prints
//! is redirected to stderr and returned as logs.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::FunctionOptions;
use crate::error::{FnkitError, FnkitResult};
use crate::payload::ResponseBody;

const NODE_BOOTSTRAP: &str = r#"
const path = require('path');
const [dir, mod, exp] = process.argv.slice(1);
console.log = (...args) => console.error(...args);
let input = '';
process.stdin.setEncoding('utf8');
process.stdin.on('data', (chunk) => { input += chunk; });
process.stdin.on('end', () => {
  let settled = false;
  const finish = (err, result) => {
    if (settled) return;
    settled = true;
    if (err) {
      console.error(err && err.stack ? err.stack : String(err));
      process.exitCode = 1;
      return;
    }
    if (result !== undefined) process.stdout.write(JSON.stringify(result));
  };
  try {
    const event = input.trim() ? JSON.parse(input) : {};
    const handler = require(path.resolve(dir, mod))[exp];
    if (typeof handler !== 'function') throw new Error(mod + '.' + exp + ' is not a function');
    const context = {
      functionName: process.env.AWS_LAMBDA_FUNCTION_NAME,
      awsRequestId: 'local',
      getRemainingTimeInMillis: () => 0,
    };
    const ret = handler(event, context, finish);
    if (ret && typeof ret.then === 'function') ret.then((r) => finish(null, r), finish);
  } catch (e) {
    finish(e);
  }
});
"#;

const PYTHON_BOOTSTRAP: &str = r#"
import importlib, json, sys, traceback
sys.path.insert(0, sys.argv[1])
out = sys.stdout
sys.stdout = sys.stderr
try:
    raw = sys.stdin.read()
    event = json.loads(raw) if raw.strip() else {}
    handler = getattr(importlib.import_module(sys.argv[2]), sys.argv[3])
    result = handler(event, None)
except Exception:
    traceback.print_exc()
    sys.exit(1)
if result is not None:
    out.write(json.dumps(result))
    out.flush()
"#;

/// Output of a local handler run.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalInvocation {
    pub result: ResponseBody,
    /// Everything the handler wrote to stdout/stderr.
    pub logs: String,
}

/// Executes a function handler on the local machine.
#[async_trait]
pub trait LocalRuntime: Send + Sync {
    async fn invoke(
        &self,
        source_dir: &Path,
        options: &FunctionOptions,
        payload: Option<&Value>,
    ) -> FnkitResult<LocalInvocation>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interpreter {
    Node,
    Python,
}

impl Interpreter {
    fn for_runtime(runtime: &str) -> FnkitResult<Self> {
        if runtime.starts_with("nodejs") {
            Ok(Self::Node)
        } else if runtime.starts_with("python") {
            Ok(Self::Python)
        } else {
            Err(FnkitError::UnsupportedRuntime {
                runtime: runtime.to_string(),
            })
        }
    }

    fn extension(self) -> &'static str {
        match self {
            Self::Node => "js",
            Self::Python => "py",
        }
    }
}

/// `LocalRuntime` backed by `node` and `python3` child processes.
#[derive(Debug, Clone)]
pub struct ProcessRuntime {
    node: String,
    python: String,
}

impl Default for ProcessRuntime {
    fn default() -> Self {
        Self {
            node: "node".to_string(),
            python: "python3".to_string(),
        }
    }
}

impl ProcessRuntime {
    pub fn new() -> Self {
        Self::default()
    }
}

fn local_error(message: impl Into<String>) -> FnkitError {
    FnkitError::LocalInvoke {
        message: message.into(),
    }
}

#[async_trait]
impl LocalRuntime for ProcessRuntime {
    async fn invoke(
        &self,
        source_dir: &Path,
        options: &FunctionOptions,
        payload: Option<&Value>,
    ) -> FnkitResult<LocalInvocation> {
        let interpreter = Interpreter::for_runtime(&options.runtime)?;
        let (module, export) = options.handler.module_export().ok_or_else(|| {
            local_error(format!(
                "handler '{}' must look like <module>.<export> to run locally",
                options.handler
            ))
        })?;

        let module_file = source_dir.join(format!("{}.{}", module, interpreter.extension()));
        if !module_file.is_file() {
            return Err(local_error(format!(
                "handler module {} not found",
                module_file.display()
            )));
        }
        // The child runs inside the source directory, so hand it an absolute path.
        let source_dir = source_dir
            .canonicalize()
            .map_err(|e| FnkitError::io("resolving source directory", e))?;

        let (program, bootstrap, module) = match interpreter {
            Interpreter::Node => (&self.node, NODE_BOOTSTRAP, module.to_string()),
            Interpreter::Python => (&self.python, PYTHON_BOOTSTRAP, module.replace('/', ".")),
        };
        let flag = match interpreter {
            Interpreter::Node => "-e",
            Interpreter::Python => "-c",
        };

        let input = match payload {
            Some(value) => serde_json::to_vec(value).map_err(|e| FnkitError::PayloadParse {
                message: e.to_string(),
            })?,
            None => Vec::new(),
        };

        tracing::debug!(
            program = %program,
            module = %module_file.display(),
            export,
            "Running handler locally"
        );

        let mut child = Command::new(program)
            .arg(flag)
            .arg(bootstrap)
            .arg(&source_dir)
            .arg(&module)
            .arg(export)
            .current_dir(&source_dir)
            .env("AWS_LAMBDA_FUNCTION_NAME", options.function_name.as_str())
            .env(
                "AWS_LAMBDA_FUNCTION_MEMORY_SIZE",
                options.memory_size.megabytes().to_string(),
            )
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| local_error(format!("failed to start '{}': {}", program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&input)
                .await
                .map_err(|e| FnkitError::io("writing payload to handler", e))?;
        }

        let limit = Duration::from_secs(u64::from(options.timeout.seconds()));
        let output = tokio::time::timeout(limit, child.wait_with_output())
            .await
            .map_err(|_| {
                local_error(format!(
                    "handler timed out after {} seconds",
                    options.timeout.seconds()
                ))
            })?
            .map_err(|e| FnkitError::io("waiting for handler", e))?;

        let logs = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            let detail = logs.trim();
            return Err(local_error(if detail.is_empty() {
                format!("handler exited with {}", output.status)
            } else {
                detail.to_string()
            }));
        }

        Ok(LocalInvocation {
            result: ResponseBody::parse(&output.stdout),
            logs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigForm;

    fn options(handler: &str, runtime: &str) -> FunctionOptions {
        ConfigForm {
            function_name: "fn1".to_string(),
            role: "arn:aws:iam::1:role/x".to_string(),
            handler: handler.to_string(),
            runtime: runtime.to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap()
        .function
    }

    fn available(program: &str) -> bool {
        std::process::Command::new(program)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn python_available() -> bool {
        available("python3")
    }

    fn node_available() -> bool {
        available("node")
    }

    #[tokio::test]
    async fn test_unsupported_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProcessRuntime::new()
            .invoke(dir.path(), &options("index.handler", "java17"), None)
            .await;
        assert!(matches!(
            result,
            Err(FnkitError::UnsupportedRuntime { runtime }) if runtime == "java17"
        ));
    }

    #[tokio::test]
    async fn test_missing_module() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProcessRuntime::new()
            .invoke(dir.path(), &options("index.handler", "nodejs18.x"), None)
            .await;
        assert!(matches!(result, Err(FnkitError::LocalInvoke { .. })));
    }

    #[tokio::test]
    async fn test_dotless_handler_cannot_run_locally() {
        let dir = tempfile::tempdir().unwrap();
        let result = ProcessRuntime::new()
            .invoke(dir.path(), &options("bootstrap", "python3.12"), None)
            .await;
        match result {
            Err(FnkitError::LocalInvoke { message }) => assert!(message.contains("bootstrap")),
            other => panic!("expected LocalInvoke, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_node_callback_handler_from_template() {
        if !node_available() {
            eprintln!("node not available, skipping");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("index.js"),
            include_str!("../templates/src/index.js"),
        )
        .unwrap();

        let payload = serde_json::json!({"key1": "value1"});
        let invocation = ProcessRuntime::new()
            .invoke(dir.path(), &options("index.handler", "nodejs18.x"), Some(&payload))
            .await
            .unwrap();

        match invocation.result {
            ResponseBody::Json(value) => assert_eq!(value["statusCode"], 200),
            other => panic!("expected a JSON result, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_node_async_handler() {
        if !node_available() {
            eprintln!("node not available, skipping");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("lib")).unwrap();
        std::fs::write(
            dir.path().join("lib").join("app.js"),
            "exports.run = async (event) => { console.log('seen', event.k); return { got: event.k }; };\n",
        )
        .unwrap();

        let payload = serde_json::json!({"k": "v"});
        let invocation = ProcessRuntime::new()
            .invoke(dir.path(), &options("lib/app.run", "nodejs20.x"), Some(&payload))
            .await
            .unwrap();

        assert_eq!(
            invocation.result,
            ResponseBody::Json(serde_json::json!({"got": "v"}))
        );
        assert!(invocation.logs.contains("seen v"));
    }

    #[tokio::test]
    async fn test_node_rejecting_handler() {
        if !node_available() {
            eprintln!("node not available, skipping");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("index.js"),
            "exports.handler = async () => { throw new Error('kaboom'); };\n",
        )
        .unwrap();

        let result = ProcessRuntime::new()
            .invoke(dir.path(), &options("index.handler", "nodejs18.x"), None)
            .await;
        match result {
            Err(FnkitError::LocalInvoke { message }) => assert!(message.contains("kaboom")),
            other => panic!("expected LocalInvoke, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_python_handler_round_trip() {
        if !python_available() {
            eprintln!("python3 not available, skipping");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("app.py"),
            "def handler(event, context):\n    print('got', event['key1'])\n    return {'echo': event['key1']}\n",
        )
        .unwrap();

        let payload = serde_json::json!({"key1": "value1"});
        let invocation = ProcessRuntime::new()
            .invoke(dir.path(), &options("app.handler", "python3.12"), Some(&payload))
            .await
            .unwrap();

        assert_eq!(
            invocation.result,
            ResponseBody::Json(serde_json::json!({"echo": "value1"}))
        );
        assert!(invocation.logs.contains("got value1"));
    }

    #[tokio::test]
    async fn test_python_handler_failure() {
        if !python_available() {
            eprintln!("python3 not available, skipping");
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("app.py"),
            "def handler(event, context):\n    raise ValueError('boom')\n",
        )
        .unwrap();

        let result = ProcessRuntime::new()
            .invoke(dir.path(), &options("app.handler", "python3.12"), None)
            .await;
        match result {
            Err(FnkitError::LocalInvoke { message }) => assert!(message.contains("boom")),
            other => panic!("expected LocalInvoke, got {:?}", other),
        }
    }
}
