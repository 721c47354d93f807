//! The canonical workbook layout.

use super::{
    categories::{
        ASSET_CATEGORIES, EXPENSE_CATEGORIES, FLOW_STEPS, GOAL_NAMES, INCOME_CATEGORIES,
        LIABILITY_CATEGORIES,
    },
    Anchor, CategoryItem, ColumnFill, ColumnSpec, Entry, Schema, SheetBody, SheetId,
    SheetLayout, Span,
};
use crate::formula::Formula;

/// Column indices shared by formulas and tests.
pub mod columns {
    pub const LABEL: u16 = 0;
    /// Amount column of Income, Expenses and Assets.
    pub const AMOUNT: u16 = 1;
    pub const NOTES: u16 = 2;

    pub mod liabilities {
        pub const BALANCE: u16 = 1;
        pub const RATE: u16 = 2;
        pub const EMI: u16 = 3;
        pub const NOTES: u16 = 4;
    }

    pub mod goals {
        pub const YEARS: u16 = 1;
        pub const INFLATION: u16 = 2;
        /// Future value needed at the goal date.
        pub const TARGET: u16 = 3;
        pub const SAVINGS: u16 = 4;
        pub const SIP: u16 = 5;
        pub const RETURN: u16 = 6;
        pub const STATUS: u16 = 7;
    }
}

use self::columns::{goals, liabilities, AMOUNT, LABEL};
use super::DisplayKind::{Currency, Date, Percentage, Plain, Total};

const DEFAULT_RETURN: f64 = 0.12;
const DEFAULT_INFLATION: f64 = 0.06;
const DEFAULT_GOAL_YEARS: f64 = 10.0;
const DEFAULT_GOAL_AMOUNT: f64 = 1_000_000.0;
const DEFAULT_GOAL_STATUS: &str = "Planning";

impl Schema {
    /// Canonical layout: navigation row, ratios on every summary sheet.
    pub fn standard() -> Self {
        Schema::new(vec![
            dashboard(),
            amount_sheet(
                SheetId::Income,
                "MONTHLY INCOME TRACKER",
                "Income Source",
                "Monthly Amount",
                &INCOME_CATEGORIES,
                "TOTAL MONTHLY INCOME",
            ),
            amount_sheet(
                SheetId::Expenses,
                "MONTHLY EXPENSE TRACKER",
                "Expense Category",
                "Monthly Amount",
                &EXPENSE_CATEGORIES,
                "TOTAL MONTHLY EXPENSES",
            ),
            amount_sheet(
                SheetId::Assets,
                "ASSET PORTFOLIO",
                "Asset Type",
                "Current Value",
                &ASSET_CATEGORIES,
                "TOTAL ASSETS",
            ),
            liabilities_sheet(),
            goals_sheet(),
            calculations(),
            financial_flow(),
        ])
    }
}

fn total(sheet: SheetId, column: u16) -> Anchor {
    Anchor::total(sheet, column)
}

fn label_column(header: &str) -> ColumnSpec {
    ColumnSpec::new(header, 30.0, Plain, ColumnFill::Label)
}

fn notes_column() -> ColumnSpec {
    ColumnSpec::new("Notes", 36.0, Plain, ColumnFill::Blank)
}

fn categories(labels: &[&str]) -> Vec<CategoryItem> {
    labels.iter().copied().map(CategoryItem::new).collect()
}

fn amount_sheet(
    id: SheetId,
    title: &str,
    label_header: &str,
    amount_header: &str,
    labels: &[&str],
    total_label: &str,
) -> SheetLayout {
    SheetLayout {
        id,
        title: title.to_string(),
        columns: vec![
            label_column(label_header),
            ColumnSpec::new(amount_header, 18.0, Currency, ColumnFill::Constant(0.0)).totalled(),
            notes_column(),
        ],
        body: SheetBody::Categories {
            items: categories(labels),
            total_label: total_label.to_string(),
        },
    }
}

fn liabilities_sheet() -> SheetLayout {
    SheetLayout {
        id: SheetId::Liabilities,
        title: "LIABILITY PORTFOLIO".to_string(),
        columns: vec![
            label_column("Liability Type"),
            ColumnSpec::new("Outstanding Amount", 20.0, Currency, ColumnFill::Constant(0.0))
                .totalled(),
            ColumnSpec::new("Interest Rate", 14.0, Percentage, ColumnFill::Constant(0.0)),
            ColumnSpec::new("Monthly EMI", 16.0, Currency, ColumnFill::Constant(0.0)).totalled(),
            notes_column(),
        ],
        body: SheetBody::Categories {
            items: categories(&LIABILITY_CATEGORIES),
            total_label: "TOTAL LIABILITIES".to_string(),
        },
    }
}

fn goals_sheet() -> SheetLayout {
    let sip = Formula::Pmt {
        rate: Anchor::same_row(goals::RETURN),
        years: Anchor::same_row(goals::YEARS),
        present: Anchor::same_row(goals::SAVINGS),
        future: Anchor::same_row(goals::TARGET),
    };

    SheetLayout {
        id: SheetId::Goals,
        title: "FINANCIAL GOALS PLANNER".to_string(),
        columns: vec![
            label_column("Goal Name"),
            ColumnSpec::new(
                "Years to Goal",
                14.0,
                Plain,
                ColumnFill::Constant(DEFAULT_GOAL_YEARS),
            ),
            ColumnSpec::new(
                "Inflation %",
                12.0,
                Percentage,
                ColumnFill::Constant(DEFAULT_INFLATION),
            ),
            ColumnSpec::new(
                "Future Value Needed",
                20.0,
                Currency,
                ColumnFill::Constant(DEFAULT_GOAL_AMOUNT),
            )
            .totalled(),
            ColumnSpec::new("Current Savings", 18.0, Currency, ColumnFill::Constant(0.0))
                .totalled(),
            ColumnSpec::new("Monthly SIP Required", 20.0, Currency, ColumnFill::Formula(sip))
                .totalled(),
            ColumnSpec::new(
                "Expected Return %",
                16.0,
                Percentage,
                ColumnFill::Constant(DEFAULT_RETURN),
            ),
            ColumnSpec::new(
                "Status",
                14.0,
                Plain,
                ColumnFill::Text(DEFAULT_GOAL_STATUS.to_string()),
            ),
        ],
        body: SheetBody::Categories {
            items: categories(&GOAL_NAMES),
            total_label: "TOTAL".to_string(),
        },
    }
}

fn key_value_columns(label_header: &str, value_header: &str) -> Vec<ColumnSpec> {
    vec![
        label_column(label_header),
        ColumnSpec::new(value_header, 20.0, Currency, ColumnFill::Blank),
    ]
}

fn dashboard() -> SheetLayout {
    let here = |key: &str| Anchor::entry(SheetId::Dashboard, key);
    let entries = vec![
        Entry::section("net_worth_summary", "NET WORTH SUMMARY"),
        Entry::formula(
            "assets",
            "Total Assets",
            Formula::Reference(total(SheetId::Assets, AMOUNT)),
            Currency,
        ),
        Entry::formula(
            "liabilities",
            "Total Liabilities",
            Formula::Reference(total(SheetId::Liabilities, liabilities::BALANCE)),
            Currency,
        ),
        Entry::formula(
            "net_worth",
            "Net Worth",
            Formula::difference(
                total(SheetId::Assets, AMOUNT),
                [total(SheetId::Liabilities, liabilities::BALANCE)],
            ),
            Total,
        ),
        Entry::formula(
            "debt_to_asset",
            "Debt-to-Asset Ratio",
            Formula::ratio(
                total(SheetId::Liabilities, liabilities::BALANCE),
                total(SheetId::Assets, AMOUNT),
            ),
            Percentage,
        ),
        Entry::section("cash_flow", "MONTHLY CASH FLOW"),
        Entry::formula(
            "income",
            "Total Income",
            Formula::Reference(total(SheetId::Income, AMOUNT)),
            Currency,
        ),
        Entry::formula(
            "expenses",
            "Total Expenses",
            Formula::Reference(total(SheetId::Expenses, AMOUNT)),
            Currency,
        ),
        Entry::formula(
            "surplus",
            "Monthly Surplus",
            Formula::difference(here("income"), [here("expenses")]),
            Total,
        ),
        Entry::formula(
            "savings_rate",
            "Savings Rate",
            Formula::ratio(here("surplus"), here("income")),
            Percentage,
        ),
        Entry::formula(
            "emi",
            "Monthly EMI Outgo",
            Formula::Reference(total(SheetId::Liabilities, liabilities::EMI)),
            Currency,
        ),
        Entry::section("goal_progress", "GOAL PROGRESS"),
        Entry::formula(
            "goal_count",
            "Goals Defined",
            Formula::CountA(Span::categories(SheetId::Goals, LABEL)),
            Plain,
        ),
        Entry::formula(
            "goal_amount",
            "Total Goal Amount",
            Formula::Sum(Span::categories(SheetId::Goals, goals::TARGET)),
            Currency,
        ),
        Entry::formula(
            "sip",
            "Monthly SIP Required",
            Formula::Reference(total(SheetId::Goals, goals::SIP)),
            Currency,
        ),
        Entry::formula("updated", "Last Updated", Formula::Today, Date),
    ];

    SheetLayout {
        id: SheetId::Dashboard,
        title: "FINANCIAL DASHBOARD".to_string(),
        columns: key_value_columns("Metric", "Value"),
        body: SheetBody::Entries(entries),
    }
}

fn calculations() -> SheetLayout {
    let here = |key: &str| Anchor::entry(SheetId::Calculations, key);
    let income = || total(SheetId::Income, AMOUNT);
    let expenses = || total(SheetId::Expenses, AMOUNT);

    let entries = vec![
        Entry::section("key_formulas", "KEY FORMULAS"),
        Entry::text(
            "fv_definition",
            "Future Value with Inflation",
            "FV = PV × (1 + inflation)^years",
        ),
        Entry::text(
            "sip_definition",
            "Monthly SIP for Goal",
            "PMT(rate/12, years×12, -current, future)",
        ),
        Entry::text(
            "cagr_definition",
            "Compound Annual Growth Rate",
            "CAGR = (Ending/Beginning)^(1/years) - 1",
        ),
        Entry::section("quick_calculators", "QUICK CALCULATORS"),
        Entry::number("current_age", "Current Age", 30.0, Plain),
        Entry::number("retirement_age", "Retirement Age", 60.0, Plain),
        Entry::formula(
            "years_to_retirement",
            "Years to Retirement",
            Formula::difference(here("retirement_age"), [here("current_age")]),
            Plain,
        ),
        Entry::section("sip_calculator", "SIP CALCULATOR"),
        Entry::number("sip_years", "Years to Goal", DEFAULT_GOAL_YEARS, Plain),
        Entry::number("sip_inflation", "Inflation Rate", DEFAULT_INFLATION, Percentage),
        Entry::number(
            "sip_future_value",
            "Future Value Required",
            DEFAULT_GOAL_AMOUNT,
            Currency,
        ),
        Entry::number("sip_current_savings", "Current Savings", 0.0, Currency),
        Entry::number("sip_return", "Expected Annual Return", DEFAULT_RETURN, Percentage),
        Entry::formula(
            "sip_monthly",
            "Monthly SIP Required",
            Formula::Pmt {
                rate: here("sip_return"),
                years: here("sip_years"),
                present: here("sip_current_savings"),
                future: here("sip_future_value"),
            },
            Total,
        ),
        Entry::section("inflation", "INFLATION ADJUSTMENT"),
        Entry::number("today_cost", "Cost in Today's Money", 500_000.0, Currency),
        Entry::formula(
            "future_cost",
            "Cost at Goal Date",
            Formula::FutureValue {
                present: here("today_cost"),
                rate: here("sip_inflation"),
                years: here("sip_years"),
            },
            Currency,
        ),
        Entry::section("cagr", "CAGR CALCULATOR"),
        Entry::number("cagr_begin", "Beginning Value", 100_000.0, Currency),
        Entry::number("cagr_end", "Ending Value", 200_000.0, Currency),
        Entry::number("cagr_years", "Years Held", 5.0, Plain),
        Entry::formula(
            "cagr_rate",
            "CAGR",
            Formula::Cagr {
                begin: here("cagr_begin"),
                end: here("cagr_end"),
                years: here("cagr_years"),
            },
            Percentage,
        ),
        Entry::section("ratios", "KEY RATIOS"),
        Entry::formula(
            "surplus",
            "Monthly Surplus Available",
            Formula::Reference(Anchor::entry(SheetId::Dashboard, "surplus")),
            Currency,
        ),
        Entry::formula(
            "savings_rate",
            "Savings Rate",
            Formula::ratio(Anchor::entry(SheetId::Dashboard, "surplus"), income()),
            Percentage,
        ),
        Entry::formula(
            "expense_ratio",
            "Expense Ratio",
            Formula::ratio(expenses(), income()),
            Percentage,
        ),
        Entry::formula(
            "debt_to_income",
            "Debt-to-Income Ratio",
            Formula::ratio(total(SheetId::Liabilities, liabilities::EMI), income()),
            Percentage,
        ),
        Entry::formula(
            "sip_budgeted",
            "SIP Budgeted in Expenses",
            Formula::Reference(Anchor::category(
                SheetId::Expenses,
                "Investments/SIP",
                AMOUNT,
            )),
            Currency,
        ),
        Entry::formula(
            "sip_shortfall",
            "SIP Shortfall vs Goals",
            Formula::difference(total(SheetId::Goals, goals::SIP), [here("sip_budgeted")]),
            Total,
        ),
    ];

    SheetLayout {
        id: SheetId::Calculations,
        title: "FINANCIAL CALCULATIONS & FORMULAS".to_string(),
        columns: key_value_columns("Calculation", "Value"),
        body: SheetBody::Entries(entries),
    }
}

fn financial_flow() -> SheetLayout {
    let here = |key: &str| Anchor::entry(SheetId::FinancialFlow, key);
    let mut entries: Vec<Entry> = FLOW_STEPS
        .iter()
        .enumerate()
        .map(|(idx, (step, action, description))| {
            Entry::text(format!("step_{}", idx + 1), *step, *action)
                .with_details(["→", *description])
        })
        .collect();

    entries.extend([
        Entry::section("cash_flow", "MONTHLY CASH FLOW"),
        Entry::formula(
            "income",
            "Gross Monthly Income",
            Formula::Reference(total(SheetId::Income, AMOUNT)),
            Currency,
        ),
        Entry::formula(
            "expenses",
            "Less: Living Expenses",
            Formula::Reference(total(SheetId::Expenses, AMOUNT)),
            Currency,
        ),
        Entry::formula(
            "emi",
            "Less: Loan EMIs",
            Formula::Reference(total(SheetId::Liabilities, liabilities::EMI)),
            Currency,
        ),
        Entry::formula(
            "investable",
            "Available for Investment",
            Formula::difference(here("income"), [here("expenses"), here("emi")]),
            Total,
        ),
        Entry::formula(
            "sip",
            "Less: Goal SIPs",
            Formula::Reference(total(SheetId::Goals, goals::SIP)),
            Currency,
        ),
        Entry::formula(
            "unallocated",
            "Unallocated Cash Flow",
            Formula::difference(here("investable"), [here("sip")]),
            Total,
        ),
        Entry::formula(
            "investable_share",
            "Investable Share of Income",
            Formula::ratio(here("investable"), here("income")),
            Percentage,
        ),
    ]);

    SheetLayout {
        id: SheetId::FinancialFlow,
        title: "FINANCIAL FLOW PROCESS".to_string(),
        columns: vec![
            label_column("Step"),
            ColumnSpec::new("Action", 26.0, Currency, ColumnFill::Blank),
            ColumnSpec::new("→", 6.0, Plain, ColumnFill::Blank),
            ColumnSpec::new("Description", 30.0, Plain, ColumnFill::Blank),
        ],
        body: SheetBody::Entries(entries),
    }
}
