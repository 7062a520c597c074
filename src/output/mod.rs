//! Output generation for the declcheck CLI application

use declcheck::grammar::{Tables, Verdict};
use serde::Serialize;
use tinytemplate::TinyTemplate;
use tracing::debug;

static TEMPLATE: &'static str = r#"{verdict}

productions
{{ for production in productions }}    r{@index}  {production}
{{ endfor }}
{{ for state in states }}state {state.index}
{{ for cell in state.action }}    {cell.symbol}  {cell.value}
{{ endfor }}{{ for cell in state.goto }}    {cell.symbol}  goto {cell.value}
{{ endfor }}{{ endfor }}"#;

#[derive(Serialize)]
struct Cell {
    symbol: String,
    value: String,
}

#[derive(Serialize)]
struct State {
    index: usize,
    action: Vec<Cell>,
    goto: Vec<Cell>,
}

#[derive(Serialize)]
struct Context {
    verdict: String,
    productions: Vec<String>,
    states: Vec<State>,
}

/// The verdict and, if there are tables to show, the tables themselves, in
/// one JSON object.
#[derive(Serialize)]
pub struct Report<'a> {
    #[serde(flatten)]
    pub verdict: &'a Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tables: Option<&'a Tables>,
}

/// Lay out the ACTION and GOTO tables one state at a time.
pub fn tables_as_text(verdict: &Verdict, tables: &Tables) -> Result<String, tinytemplate::error::Error> {
    let context = Context {
        verdict: verdict
            .message
            .clone(),
        productions: tables
            .productions
            .iter()
            .map(|production| production.to_string())
            .collect(),
        states: tables
            .action
            .iter()
            .zip(&tables.goto)
            .enumerate()
            .map(|(index, (action, goto))| State {
                index,
                action: action
                    .iter()
                    .map(|(symbol, action)| Cell {
                        symbol: symbol.clone(),
                        value: action.to_string(),
                    })
                    .collect(),
                goto: goto
                    .iter()
                    .map(|(symbol, target)| Cell {
                        symbol: symbol.clone(),
                        value: target.to_string(),
                    })
                    .collect(),
            })
            .collect(),
    };

    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template("tables", TEMPLATE)?;

    let rendered = tt.render("tables", &context)?;
    debug!("Rendered {} states", tables.states);

    Ok(rendered)
}

pub fn as_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
