use skill_catalog::content::{embedded_sources, Content, RawContent};
use skill_catalog::validation::Severity;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let raw = RawContent::parse(&embedded_sources())?;
    let issues = raw.validate();

    let mut errors = 0usize;
    let mut warnings = 0usize;
    for issue in &issues {
        match issue.severity() {
            Severity::Error => {
                errors += 1;
                error!(issue = ?issue, "{}", issue);
            }
            Severity::Warning => {
                warnings += 1;
                warn!(issue = ?issue, "{}", issue);
            }
        }
    }

    let content = Content::from_raw(raw)?;
    info!(
        topics = content.catalog().len(),
        questions = content.catalog().question_total(),
        dashboards = content.dashboards().len(),
        errors,
        warnings,
        "catalog check finished"
    );

    if errors > 0 {
        anyhow::bail!("catalog has {} error(s) and {} warning(s)", errors, warnings);
    }
    Ok(())
}
