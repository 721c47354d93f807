use finance_template::{
    formula,
    layout::{CellRef, FIRST_DATA_ROW},
    Schema, SheetId, Template,
};
use regex::Regex;

fn standard() -> Template {
    Template::build(&Schema::standard()).expect("standard template builds")
}

fn formula_listing(template: &Template, id: SheetId) -> String {
    let sheet = template.sheet(id).unwrap();
    sheet
        .rows
        .iter()
        .filter_map(|row| {
            let cell = row.cells.iter().find(|cell| cell.value.as_formula().is_some())?;
            Some(format!(
                "{} {} = {}",
                CellRef::new(row.index, cell.column),
                row.label(),
                cell.value.as_formula()?
            ))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn dashboard_formulas() {
    insta::assert_snapshot!(formula_listing(&standard(), SheetId::Dashboard), @r"
B6 Total Assets = Assets!B23
B7 Total Liabilities = Liabilities!B17
B8 Net Worth = Assets!B23-Liabilities!B17
B9 Debt-to-Asset Ratio = IFERROR(Liabilities!B17/Assets!B23,0)
B11 Total Income = Income!B17
B12 Total Expenses = Expenses!B27
B13 Monthly Surplus = B11-B12
B14 Savings Rate = IFERROR(B13/B11,0)
B15 Monthly EMI Outgo = Liabilities!D17
B17 Goals Defined = COUNTA(Goals!A5:A14)
B18 Total Goal Amount = SUM(Goals!D5:D14)
B19 Monthly SIP Required = Goals!F15
B20 Last Updated = TODAY()
");
}

#[test]
fn financial_flow_chains_deductions() {
    let template = standard();
    assert_eq!(
        template.formula_at(SheetId::FinancialFlow, "B19"),
        Some("B16-B17-B18")
    );
    assert_eq!(template.formula_at(SheetId::FinancialFlow, "B21"), Some("B19-B20"));
    assert_eq!(
        template.formula_at(SheetId::FinancialFlow, "B20"),
        Some("Goals!F15")
    );
}

#[test]
fn goal_pmt_resolves_to_documented_defaults() {
    let template = standard();
    assert_eq!(
        template.formula_at(SheetId::Calculations, "B19"),
        Some("PMT(B18/12,B14*12,-B17,B16)")
    );

    let goals = template.sheet(SheetId::Goals).unwrap();
    let pmt = template
        .formula_at(SheetId::Goals, "F5")
        .expect("monthly SIP formula");
    assert_eq!(pmt, "PMT(G5/12,B5*12,-E5,D5)");

    let shape = Regex::new(r"^PMT\(([A-Z]+\d+)/12,([A-Z]+\d+)\*12,-([A-Z]+\d+),([A-Z]+\d+)\)$")
        .unwrap();
    let captures = shape.captures(pmt).expect("PMT shape");
    let value = |idx: usize| {
        let cell = CellRef::parse(&captures[idx]).unwrap();
        goals
            .cell_at(cell)
            .and_then(|cell| cell.value.as_number())
            .unwrap_or_else(|| panic!("{} holds no number", &captures[idx]))
    };
    let (rate, years, present, future) = (value(1), value(2), value(3), value(4));
    assert_eq!(rate, 0.12);
    assert_eq!(years, 10.0);
    assert_eq!(present, 0.0);
    assert_eq!(future, 1_000_000.0);
    assert_eq!(
        formula::pmt(rate, years, present, future),
        "PMT(0.12/12,10*12,-0,1000000)"
    );
}

#[test]
fn every_goal_row_carries_sip_formula_and_status() {
    let template = standard();
    let goals = template.sheet(SheetId::Goals).unwrap();
    let category_rows = goals.rows.iter().filter(|row| row.index < FIRST_DATA_ROW + 10);
    for row in category_rows {
        let n = row.index + 1;
        assert_eq!(
            row.cell(5).and_then(|cell| cell.value.as_formula()),
            Some(format!("PMT(G{n}/12,B{n}*12,-E{n},D{n})").as_str()),
            "SIP on {}",
            row.label()
        );
        assert_eq!(
            row.cell(7).and_then(|cell| cell.value.as_text()),
            Some("Planning"),
            "status on {}",
            row.label()
        );
    }
    assert_eq!(template.formula_at(SheetId::Goals, "D15"), Some("SUM(D5:D14)"));
    assert_eq!(template.formula_at(SheetId::Goals, "E15"), Some("SUM(E5:E14)"));
    assert_eq!(template.formula_at(SheetId::Goals, "F15"), Some("SUM(F5:F14)"));
}

#[test]
fn ratios_are_guarded_against_empty_denominators() {
    let template = standard();
    let ratios: Vec<&str> = template
        .sheets()
        .iter()
        .flat_map(|sheet| &sheet.rows)
        .flat_map(|row| &row.cells)
        .filter_map(|cell| cell.value.as_formula())
        .filter(|formula| formula.contains('/') && !formula.starts_with("PMT") && !formula.contains('^'))
        .collect();
    assert!(!ratios.is_empty());
    for formula in ratios {
        assert!(
            formula.starts_with("IFERROR(") && formula.ends_with(",0)"),
            "unguarded division {formula}"
        );
    }
}

#[test]
fn calculations_growth_formulas() {
    let template = standard();
    assert_eq!(
        template.formula_at(SheetId::Calculations, "B12"),
        Some("B11-B10")
    );
    assert_eq!(
        template.formula_at(SheetId::Calculations, "B22"),
        Some("B21*(1+B15)^B14")
    );
    assert_eq!(
        template.formula_at(SheetId::Calculations, "B27"),
        Some("(B25/B24)^(1/B26)-1")
    );
    assert_eq!(
        template.formula_at(SheetId::Calculations, "B30"),
        Some("IFERROR(Dashboard!B13/Income!B17,0)")
    );
}

#[test]
fn sip_budget_is_compared_with_goal_sips() {
    let template = standard();
    assert_eq!(
        template.formula_at(SheetId::Calculations, "B33"),
        Some("Expenses!B17")
    );
    assert_eq!(
        template.formula_at(SheetId::Calculations, "B34"),
        Some("Goals!F15-B33")
    );
}
