use anyhow::{Context, Result, bail};
use chrono::Utc;
use edudash_offline::{
    AppConfig, ConnectionPool, IdentityScope, PendingQueue, QueueKey, SqlitePendingQueue,
};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
struct CliOptions {
    output: Option<PathBuf>,
    pretty: bool,
    identity: Option<String>,
    database_url: Option<String>,
}

#[derive(Debug, serde::Serialize)]
struct QueueCount {
    entity_type: String,
    queue_kind: String,
    count: u64,
}

#[derive(Debug, serde::Serialize)]
struct IdentityReport {
    identity: String,
    total: u64,
    queues: Vec<QueueCount>,
}

#[derive(Debug, serde::Serialize)]
struct PendingQueueReport {
    generated_at_ms: i64,
    identity_count: usize,
    total_entries: u64,
    identities: Vec<IdentityReport>,
}

fn usage() -> &'static str {
    "Usage: pending_queue_report [--identity <scope>] [--output <path>] [--pretty] [--database-url <url>]"
}

fn write_output(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
}

fn emit_payload(target: Option<&Path>, payload: &str) -> Result<()> {
    if let Some(path) = target {
        write_output(path, payload)?;
        println!("Report written to {}", path.display());
    } else {
        println!("{payload}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(args)?;

    let database_url = resolve_database_url(&options);
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let report = rt.block_on(async {
        collect_report(&database_url, options.identity.as_deref())
            .await
            .with_context(|| format!("Failed to read pending queues from {database_url}"))
    })?;

    let payload = to_json(&report, options.pretty)?;
    emit_payload(options.output.as_deref(), &payload)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(serde_json::to_string(value)?)
    }
}

fn parse_args<I>(args: I) -> Result<CliOptions>
where
    I: IntoIterator<Item = String>,
{
    let mut output: Option<PathBuf> = None;
    let mut pretty = false;
    let mut identity: Option<String> = None;
    let mut database_url: Option<String> = None;

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--output requires a path\n{}", usage()))?;
                output = Some(PathBuf::from(path));
            }
            "--pretty" => {
                pretty = true;
            }
            "--identity" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--identity requires a value\n{}", usage()))?;
                if value.trim().is_empty() {
                    bail!("--identity must not be empty");
                }
                identity = Some(value);
            }
            "--database-url" => {
                let value = iter.next().ok_or_else(|| {
                    anyhow::anyhow!("--database-url requires a value\n{}", usage())
                })?;
                database_url = Some(value);
            }
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            other => {
                bail!("Unknown argument: {other}\n{}", usage());
            }
        }
    }

    Ok(CliOptions {
        output,
        pretty,
        identity,
        database_url,
    })
}

fn resolve_database_url(options: &CliOptions) -> String {
    if let Some(url) = &options.database_url {
        return url.clone();
    }
    AppConfig::from_env().database.url
}

async fn collect_report(database_url: &str, identity: Option<&str>) -> Result<PendingQueueReport> {
    let pool = ConnectionPool::new(database_url)
        .await
        .with_context(|| format!("Failed to connect to database at {database_url}"))?;
    pool.migrate().await.context("Failed to apply migrations")?;
    let queue = SqlitePendingQueue::new(pool.get_pool().clone());

    let identities = match identity {
        Some(raw) => vec![IdentityScope::parse(raw).map_err(anyhow::Error::msg)?],
        None => queue
            .list_identities()
            .await
            .context("Failed to list identities")?,
    };

    let mut reports = Vec::with_capacity(identities.len());
    for scope in identities {
        let mut queues = Vec::new();
        for key in QueueKey::all_for(&scope) {
            let count = queue
                .count(&key)
                .await
                .with_context(|| format!("Failed to count {key}"))?;
            if count > 0 {
                queues.push(QueueCount {
                    entity_type: key.entity_type.as_str().to_string(),
                    queue_kind: key.queue_kind.as_str().to_string(),
                    count,
                });
            }
        }
        reports.push(IdentityReport {
            identity: scope.to_string(),
            total: queues.iter().map(|q| q.count).sum(),
            queues,
        });
    }

    pool.close().await;
    Ok(build_report(reports))
}

fn build_report(identities: Vec<IdentityReport>) -> PendingQueueReport {
    PendingQueueReport {
        generated_at_ms: Utc::now().timestamp_millis(),
        identity_count: identities.len(),
        total_entries: identities.iter().map(|i| i.total).sum(),
        identities,
    }
}
