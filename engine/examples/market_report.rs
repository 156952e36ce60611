//! Example demonstrating a full market analysis run
//!
//! This example shows how to use the engine library to:
//! 1. Assemble a wide monthly sales table in memory
//! 2. Ingest and validate it into a record store
//! 3. Run the gap / seasonality / opportunity pipeline
//! 4. Inspect the ranked results and market summary
//!
//! To run this example:
//! ```bash
//! cargo run --example market_report
//! ```

#[cfg(feature = "local-source")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use cmi_rust::config::AnalysisConfig;
    use cmi_rust::core::domain::{MonthKey, MonthSpan};
    use cmi_rust::pipeline::{ingest, run_analysis};
    use cmi_rust::sources::MemorySource;

    println!("=== CMI Market Opportunity Report ===\n");

    // Step 1: Assemble a small wide table: three regions, two SKUs each,
    // one full calendar year per row.
    println!("1. Assembling wide sales table...");
    let csv = "\
Region,Province,Precision Area,KEY MANU  & KINZA,BRAND,CSD Flavor Segment,REG/DIET,PACK TYPE,PACK SIZE,ITEM,\
Jan'24,Feb'24,Mar'24,Apr'24,May'24,Jun'24,Jul'24,Aug'24,Sep'24,Oct'24,Nov'24,Dec'24
Central,Riyadh,Riyadh City,PepsiCo,Pepsi,Cola,REG,Can,330ml,1001,80,85,95,110,140,180,210,205,160,120,95,85
Central,Riyadh,Riyadh City,PepsiCo,Pepsi,Cola,DIET,Can,330ml,1002,20,22,25,28,35,45,50,48,40,30,24,21
East,Dammam,Dammam City,Coca-Cola,Coke,Cola,REG,Bottle,500ml,2001,60,65,70,90,120,160,190,185,140,100,75,0
East,Dammam,Dammam City,Coca-Cola,Coke,Cola,DIET,Bottle,500ml,2002,0,0,0,0,12,18,22,20,15,0,0,0
West,Makkah,Jeddah,Aujan,Rani,Fruit Flavors,REG,Can,330ml,3001,40,45,50,70,110,150,170,165,120,80,55,45
West,Makkah,Jeddah,Aujan,Rani,Fruit Flavors,REG,Bottle,500ml,3002,0,0,30,40,60,90,100,95,70,0,0,0
";
    let source = MemorySource::new(csv);

    // Step 2: Ingest with the default configuration for the 2024 window.
    println!("2. Ingesting and validating...");
    let config = AnalysisConfig::for_window(MonthSpan::new(
        MonthKey::new(2024, 1),
        MonthKey::new(2024, 12),
    ));
    let records = ingest(&source, &config).await?;
    println!(
        "   Loaded {} observations ({} zero-sale)\n",
        records.len(),
        records.zero_count()
    );

    // Step 3: Run the full pipeline.
    println!("3. Running analysis...");
    let report = run_analysis(records, &config).await?;
    println!(
        "   {} ranked groups, {} diagnostics\n",
        report.scores.len(),
        report.diagnostics.len()
    );

    // Step 4: Results.
    println!("4. Results:\n");
    println!("   Market Summary:");
    println!("   ---------------");
    println!("   Total sales: {:.0}", report.summary.total_sales);
    println!(
        "   Zero-sales share: {:.1}%",
        report.summary.zero_share * 100.0
    );
    if let (Some(peak), Some(trough)) = (report.summary.peak_month, report.summary.trough_month) {
        println!("   Peak month: {peak}, trough month: {trough}");
    }
    println!(
        "   Manufacturer HHI: {:.3}\n",
        report.summary.manufacturer_hhi
    );

    println!("   Ranked Opportunities:");
    println!("   ---------------------");
    for score in &report.scores {
        println!(
            "   {}. {} (score: {:.3}, gap: {:.2}, seasonality: {:.2}, penetration: {:.2})",
            score.rank,
            score.key,
            score.composite_score,
            score.gap_component,
            score.seasonality_component,
            score.penetration_component
        );
    }
    println!();

    if !report.diagnostics.is_empty() {
        println!("   Diagnostics:");
        println!("   ------------");
        for diagnostic in &report.diagnostics {
            println!("   • {diagnostic}");
        }
        println!();
    }

    println!("   Run checksum: {}", report.checksum);
    println!("\n=== Report Complete ===");

    Ok(())
}

#[cfg(not(feature = "local-source"))]
fn main() {
    eprintln!("This example requires the 'local-source' feature to be enabled.");
    eprintln!();
    eprintln!("  cargo run --example market_report --features local-source");
    eprintln!();
    std::process::exit(1);
}
