use crate::infra::{agreement_catalog, load_engine};
use clap::Args;
use origin_engine::bom::BomImporter;
use origin_engine::config::AppConfig;
use origin_engine::error::AppError;
use origin_engine::origin::{Material, OriginEngine, OriginRequest, OriginResult};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// JSON file holding the origin request
    #[arg(long)]
    pub(crate) request: PathBuf,
    /// Bill of materials CSV replacing the request's materials
    #[arg(long)]
    pub(crate) bom: Option<PathBuf>,
    /// Pretty-print the JSON result
    #[arg(long)]
    pub(crate) pretty: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct AgreementsArgs {
    /// Emit the catalog listing as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Print the full JSON result after each scenario summary
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        request,
        bom,
        pretty,
    } = args;

    let config = AppConfig::load()?;
    let engine = load_engine(&config.engine)?;

    let raw = std::fs::read_to_string(&request)?;
    let mut request: OriginRequest = serde_json::from_str(&raw)?;
    if let Some(path) = bom {
        request.materials = BomImporter::from_path(path, request.product_value)?;
    }

    let result = engine.calculate_origin(&request)?;
    let rendered = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");
    Ok(())
}

pub(crate) fn run_agreements(args: AgreementsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = load_engine(&config.engine)?;
    let catalog = agreement_catalog(engine.repository());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("Rule catalog version {}", catalog.version);
    for agreement in &catalog.agreements {
        println!(
            "\n{} - {} (territories v{}, effective {})",
            agreement.id, agreement.name, agreement.territory_version, agreement.effective_from
        );
        println!("  Rules: {}", agreement.rules);
        println!("  Originating: {}", agreement.territories.join(", "));
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let engine = OriginEngine::builtin()?;

    println!("Rules-of-origin demo (catalog {})", engine.repository().version());
    for (title, request) in demo_scenarios() {
        let result = engine.calculate_origin(&request)?;
        render_result(title, &request, &result);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }
    Ok(())
}

fn demo_scenarios() -> Vec<(&'static str, OriginRequest)> {
    let mut unmatched = polymer(Vec::new(), &[]);
    unmatched.hs_code = "999999".to_string();
    unmatched.trade_agreement = "Unknown".to_string();

    vec![
        (
            "Polyethylene with EU and Canadian inputs",
            polymer(
                vec![
                    demo_material("390120", "EU", 600.0),
                    demo_material("290110", "CA", 200.0),
                    demo_material("381230", "CN", 200.0),
                ],
                &["Polymerisation"],
            ),
        ),
        (
            "Polyethylene compounded from imported resin",
            polymer(
                vec![
                    demo_material("390120", "CN", 600.0),
                    demo_material("290110", "MX", 250.0),
                    demo_material("381230", "US", 150.0),
                ],
                &["Compounding", "Extrusion"],
            ),
        ),
        ("Product outside the rule catalog", unmatched),
    ]
}

fn polymer(materials: Vec<Material>, processes: &[&str]) -> OriginRequest {
    OriginRequest {
        product_sku: "PE-FILM-01".to_string(),
        hs_code: "390110".to_string(),
        trade_agreement: "CETA".to_string(),
        product_value: 1000.0,
        materials,
        manufacturing_processes: processes.iter().map(|p| p.to_string()).collect(),
    }
}

fn demo_material(hs_code: &str, origin: &str, value: f64) -> Material {
    Material {
        hs_code: hs_code.to_string(),
        origin: origin.to_string(),
        value,
        percentage: value / 10.0,
    }
}

fn render_result(title: &str, request: &OriginRequest, result: &OriginResult) {
    println!("\n{title}");
    println!(
        "  {} (HS {}) under {}",
        request.product_sku, request.hs_code, request.trade_agreement
    );
    println!(
        "  Verdict: {} (confidence {:.2})",
        if result.is_conform {
            "originating"
        } else {
            "not originating"
        },
        result.confidence
    );
    if !result.applied_rules.is_empty() {
        let ids: Vec<&str> = result
            .applied_rules
            .iter()
            .map(|rule| rule.id.as_str())
            .collect();
        println!("  Deciding rules: {}", ids.join(", "));
    }
    println!(
        "  Non-originating content: {:.1}%",
        result.calculations.max_nom
    );
    for alternative in &result.alternatives {
        println!(
            "  - {} {}: {}",
            alternative.rule,
            alternative.kind.code(),
            if alternative.result { "pass" } else { "fail" }
        );
    }
    println!("  {}", result.explanation);
}
