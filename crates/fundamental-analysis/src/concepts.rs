//! Candidate concept names, in priority order. Filers pick different tags
//! for the same line item, so every lookup walks one of these lists.

pub const REVENUE: &[&str] = &[
    "RevenueFromContractWithCustomerExcludingAssessedTax",
    "RevenueFromContractWithCustomerIncludingAssessedTax",
    "Revenues",
    "SalesRevenueNet",
    "SalesRevenueGoodsNet",
    "SalesRevenueServicesNet",
    "Revenue",
];

pub const NET_INCOME: &[&str] = &[
    "NetIncomeLoss",
    "ProfitLoss",
    "ProfitLossAttributableToOwnersOfParent",
];

pub const EQUITY: &[&str] = &[
    "StockholdersEquity",
    "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
    "Equity",
    "EquityAttributableToOwnersOfParent",
];

pub const OPERATING_CASH_FLOW: &[&str] = &[
    "NetCashProvidedByUsedInOperatingActivities",
    "CashFlowsFromUsedInOperatingActivities",
    "NetCashFlowsFromUsedInOperatingActivities",
    "CashFlowsFromUsedInOperations",
];

pub const CAPEX: &[&str] = &[
    "PaymentsToAcquirePropertyPlantAndEquipment",
    "PaymentsToAcquireProductiveAssets",
    "CapitalExpenditures",
    "PurchaseOfPropertyPlantAndEquipment",
    "AdditionsToPropertyPlantAndEquipment",
    "PaymentsToAcquireIntangibleAssets",
    "PurchaseOfIntangibleAssets",
];

pub const EPS: &[&str] = &[
    "EarningsPerShareDiluted",
    "EarningsPerShareBasic",
    "BasicEarningsLossPerShare",
    "DilutedEarningsLossPerShare",
];

pub const WEIGHTED_SHARES: &[&str] = &[
    "WeightedAverageNumberOfDilutedSharesOutstanding",
    "WeightedAverageNumberOfSharesOutstandingDiluted",
    "WeightedAverageNumberOfSharesOutstandingBasic",
];

pub const ASSETS: &[&str] = &["Assets"];
pub const LIABILITIES: &[&str] = &["Liabilities"];
pub const CURRENT_ASSETS: &[&str] = &["AssetsCurrent", "CurrentAssets"];
pub const CURRENT_LIABILITIES: &[&str] = &["LiabilitiesCurrent", "CurrentLiabilities"];
pub const NONCURRENT_LIABILITIES: &[&str] = &["LiabilitiesNoncurrent", "NoncurrentLiabilities"];

pub const CASH_AND_SHORT_TERM: &[&str] = &["CashCashEquivalentsAndShortTermInvestments"];
pub const CASH_ONLY: &[&str] = &["CashAndCashEquivalentsAtCarryingValue", "CashAndCashEquivalents"];

/// Single tags that already represent total debt, us-gaap first.
pub const DEBT_US_GAAP: &[&str] = &[
    "Debt",
    "LongTermDebtAndCapitalLeaseObligations",
    "LongTermDebtAndFinanceLeaseLiabilities",
    "LongTermDebt",
    "DebtNoncurrent",
    "DebtCurrent",
    "NotesPayable",
    "ConvertibleDebt",
];

pub const DEBT_IFRS: &[&str] = &["Borrowings", "BorrowingsCurrent", "BorrowingsNoncurrent"];

/// Current + non-current pairs summed when no total tag exists.
pub const DEBT_COMBOS: &[(&str, &str)] = &[
    ("DebtCurrent", "DebtNoncurrent"),
    (
        "LongTermDebtAndCapitalLeaseObligationsCurrent",
        "LongTermDebtAndCapitalLeaseObligationsNoncurrent",
    ),
    (
        "LongTermDebtAndFinanceLeaseLiabilitiesCurrent",
        "LongTermDebtAndFinanceLeaseLiabilitiesNoncurrent",
    ),
];

pub const DEBT_COMBOS_IFRS: &[(&str, &str)] = &[("BorrowingsCurrent", "BorrowingsNoncurrent")];

pub const EBIT: &[&str] = &["EarningsBeforeInterestAndTaxes", "EBIT", "OperatingIncomeLoss", "ProfitLossFromOperatingActivities"];

pub const NET_INTEREST: &[&str] = &[
    "InterestIncomeExpenseNet",
    "InterestIncomeExpenseNonoperatingNet",
    "InterestIncomeExpenseNetNonoperating",
    "InterestIncomeExpenseNetOfHedgingActivities",
];

pub const INTEREST_EXPENSE: &[&str] = &["InterestExpense", "InterestExpenseNonoperating", "InterestAndDebtExpense", "FinanceCosts"];

pub const CURRENCY_UNITS: &[&str] = &["USD"];
pub const EPS_UNITS: &[&str] = &["USD-per-shares", "USD/shares", "USD", "DKK", "EUR"];
pub const SHARE_UNITS: &[&str] = &["shares"];

/// Tried after the preferred units when a filer reports in another currency.
pub const FALLBACK_CURRENCY_UNITS: &[&str] = &[
    "USD", "DKK", "EUR", "GBP", "JPY", "KRW", "CHF", "SEK", "NOK", "CAD", "AUD",
];
