//! Fixed category lists. Order here is row order in the workbook.

pub const INCOME_CATEGORIES: [&str; 12] = [
    "Salary/Wages",
    "Business Income",
    "Rental Income",
    "Dividend Income",
    "Interest Income",
    "Capital Gains",
    "Freelance Income",
    "Pension",
    "Social Security",
    "Other Income 1",
    "Other Income 2",
    "Other Income 3",
];

pub const EXPENSE_CATEGORIES: [&str; 22] = [
    "Housing (Rent/EMI)",
    "Utilities",
    "Groceries",
    "Transportation",
    "Insurance Premiums",
    "Healthcare",
    "Education",
    "Entertainment",
    "Dining Out",
    "Clothing",
    "Personal Care",
    "Phone/Internet",
    "Investments/SIP",
    "Loan Payments",
    "Credit Card Payments",
    "Emergency Fund",
    "Charity/Donations",
    "Travel",
    "Hobbies",
    "Maintenance",
    "Other Expenses 1",
    "Other Expenses 2",
];

pub const ASSET_CATEGORIES: [&str; 18] = [
    "Cash in Hand",
    "Savings Account",
    "Current Account",
    "Fixed Deposits",
    "Mutual Funds",
    "Stocks/Equity",
    "Bonds",
    "PPF",
    "EPF",
    "NPS",
    "Real Estate (Primary)",
    "Real Estate (Investment)",
    "Gold/Jewelry",
    "Vehicle",
    "Insurance (Cash Value)",
    "Business Assets",
    "Other Assets 1",
    "Other Assets 2",
];

pub const LIABILITY_CATEGORIES: [&str; 12] = [
    "Home Loan",
    "Car Loan",
    "Personal Loan",
    "Education Loan",
    "Credit Card Outstanding",
    "Business Loan",
    "Gold Loan",
    "Loan from Friends/Family",
    "Other Loans 1",
    "Other Loans 2",
    "Outstanding Bills",
    "Tax Liabilities",
];

/// Every goal starts from the same defaults; see `layout::standard`.
pub const GOAL_NAMES: [&str; 10] = [
    "Child Education",
    "Child Marriage",
    "House Purchase",
    "Car Purchase",
    "Retirement Fund",
    "Emergency Fund",
    "Vacation Fund",
    "Business Setup",
    "Health Insurance",
    "Other Goal",
];

/// Steps of the process chart: label, action, description.
pub const FLOW_STEPS: [(&str, &str, &str); 10] = [
    ("STEP 1", "Track Monthly Income", "Record all income sources"),
    ("STEP 2", "Track Monthly Expenses", "Categorize all expenses"),
    ("STEP 3", "Calculate Surplus", "Income - Expenses"),
    ("STEP 4", "List Assets & Liabilities", "Current financial position"),
    ("STEP 5", "Define Financial Goals", "Short & long term goals"),
    ("STEP 6", "Calculate Future Value", "Adjust for inflation"),
    ("STEP 7", "Determine SIP Amount", "Monthly investment needed"),
    ("STEP 8", "Allocate Surplus", "Distribute to goals"),
    ("STEP 9", "Monitor & Review", "Monthly tracking"),
    ("STEP 10", "Adjust Strategy", "Based on performance"),
];
