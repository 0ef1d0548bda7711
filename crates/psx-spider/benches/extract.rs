use criterion::*;
use psx_spider::stock::analysis::analyze_records;
use psx_spider::stock::extract::extract_financials;
use psx_spider::stock::record::FinancialRecord;

// read a saved company page to a string
#[inline]
fn read_page(symbol: &str) -> String {
    let path = format!("./tests/files/{symbol}.html");
    std::fs::read_to_string(&path)
        .map_err(|err| {
            println!("Unable to open file: {:?}", err);
            err
        })
        .unwrap()
}

// extract financials (from a page)
// ----------------------------------------------------------
fn benchmark_extraction(c: &mut Criterion) {
    let page = read_page("LUCK");

    c.bench_function("extract financials", |b| {
        b.iter(|| {
            let _financials = extract_financials(black_box(&page));
        })
    });
}

// analyze records
// ----------------------------------------------------------
fn benchmark_analysis(c: &mut Criterion) {
    let records: Vec<FinancialRecord> = ["LUCK", "NML", "PIBTL"]
        .iter()
        .cycle()
        .take(600)
        .enumerate()
        .map(|(i, symbol)| FinancialRecord {
            symbol: format!("{symbol}{i}"),
            name: symbol.to_string(),
            sector: "BENCH".to_string(),
            financials: extract_financials(&read_page(symbol)),
        })
        .collect();

    c.bench_function("analyze records", |b| {
        b.iter(|| {
            let _analyzed = analyze_records(black_box(records.clone()));
        })
    });
}

criterion_group!(benches, benchmark_extraction, benchmark_analysis);
criterion_main!(benches);
