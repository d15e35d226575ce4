//! Writes a deterministic sample data file with the three dataset shapes:
//! NAVs (one column per fund), subscriptions/redemptions and net assets
//! (one row per date and fund).
//!
//! `generate_sample [OUTPUT]`: `.csv` outputs get the NAV table only,
//! anything else becomes a multi-sheet workbook. Default: `data_fcp.xlsx`.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use fcp_dashboard::config::{DEFAULT_DATA_FILE, DEFAULT_SHEET_NAME};
use log::info;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

const FUNDS: [(&str, f64, f64, f64); 4] = [
    // name, starting NAV, daily drift, daily volatility
    ("FCP Actions", 1_000.0, 0.0004, 0.012),
    ("FCP Obligations", 500.0, 0.0002, 0.003),
    ("FCP Diversifié", 750.0, 0.0003, 0.007),
    ("FCP Monétaire", 100.0, 0.0001, 0.0005),
];
const CLIENT_TYPES: [&str; 3] = ["Particuliers", "Institutionnels", "Entreprises"];
const TRADING_DAYS: usize = 260;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Weekdays starting at `start`.
fn business_days(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
    std::iter::successors(Some(start), |d| Some(*d + Duration::days(1)))
        .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
        .take(n)
        .collect()
}

/// Geometric random walk per fund, aligned with `dates`.
fn nav_paths(dates: &[NaiveDate], rng: &mut SimpleRng) -> Vec<Vec<f64>> {
    FUNDS
        .iter()
        .map(|&(_, start, drift, vol)| {
            let mut nav = start;
            dates
                .iter()
                .map(|_| {
                    nav *= 1.0 + rng.gauss(drift, vol);
                    (nav * 100.0).round() / 100.0
                })
                .collect()
        })
        .collect()
}

/// Days since the 1899-12-30 spreadsheet epoch.
fn excel_serial(date: NaiveDate) -> f64 {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid epoch");
    (date - epoch).num_days() as f64
}

fn write_header(sheet: &mut Worksheet, names: &[&str]) -> Result<()> {
    for (col, name) in names.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    Ok(())
}

fn write_csv(path: &Path, dates: &[NaiveDate], navs: &[Vec<f64>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;

    let mut header = vec!["Date".to_string()];
    header.extend(FUNDS.iter().map(|f| f.0.to_string()));
    writer.write_record(&header)?;

    for (i, date) in dates.iter().enumerate() {
        let mut record = vec![date.format("%Y-%m-%d").to_string()];
        record.extend(navs.iter().map(|series| format!("{:.2}", series[i])));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_workbook(
    path: &Path,
    dates: &[NaiveDate],
    navs: &[Vec<f64>],
    rng: &mut SimpleRng,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let amount_format = Format::new().set_num_format("#,##0.00");

    // ---- Valeurs Liquidatives: one column per fund ----
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(DEFAULT_SHEET_NAME)?;
        let mut names = vec!["Date"];
        names.extend(FUNDS.iter().map(|f| f.0));
        write_header(sheet, &names)?;

        for (i, date) in dates.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_number_with_format(row, 0, excel_serial(*date), &date_format)?;
            for (f, series) in navs.iter().enumerate() {
                sheet.write_number(row, f as u16 + 1, series[i])?;
            }
        }
    }

    // ---- Souscriptions Rachats: weekly flows per fund and client type ----
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Souscriptions Rachats")?;
        write_header(sheet, &["Date", "FCP", "Type Client", "Souscriptions", "Rachats"])?;

        let mut row = 1u32;
        for date in dates.iter().step_by(5) {
            for &(fund, start, _, _) in &FUNDS {
                for client in CLIENT_TYPES {
                    let scale = start * 1_000.0;
                    let subscriptions = (rng.gauss(1.0, 0.5) * scale).max(0.0);
                    let redemptions = (rng.gauss(0.9, 0.5) * scale).max(0.0);
                    sheet.write_number_with_format(row, 0, excel_serial(*date), &date_format)?;
                    sheet.write_string(row, 1, fund)?;
                    sheet.write_string(row, 2, client)?;
                    sheet.write_number_with_format(row, 3, subscriptions.round(), &amount_format)?;
                    sheet.write_number_with_format(row, 4, redemptions.round(), &amount_format)?;
                    row += 1;
                }
            }
        }
    }

    // ---- Actifs Nets: month-end net assets per fund ----
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Actifs Nets")?;
        write_header(sheet, &["Date", "FCP", "Actif Net"])?;

        let month_ends: Vec<usize> = (0..dates.len())
            .filter(|&i| i + 1 == dates.len() || dates[i + 1].month() != dates[i].month())
            .collect();

        let mut row = 1u32;
        for i in month_ends {
            for (f, &(fund, _, _, _)) in FUNDS.iter().enumerate() {
                let units = 50_000.0 + 10_000.0 * f as f64;
                sheet.write_number_with_format(row, 0, excel_serial(dates[i]), &date_format)?;
                sheet.write_string(row, 1, fund)?;
                sheet.write_number_with_format(row, 2, (navs[f][i] * units).round(), &amount_format)?;
                row += 1;
            }
        }
    }

    workbook.save(path).context("writing workbook")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());
    let output = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).context("invalid start date")?;
    let dates = business_days(start, TRADING_DAYS);
    let navs = nav_paths(&dates, &mut rng);

    let is_csv = output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        write_csv(output, &dates, &navs)?;
    } else {
        write_workbook(output, &dates, &navs, &mut rng)?;
    }

    info!("sample written to {}", output.display());
    println!(
        "Wrote {} dates x {} funds to {}",
        dates.len(),
        FUNDS.len(),
        output.display()
    );
    Ok(())
}
