//! The built-in ordered rule table.
//!
//! Table position is the precedence contract. Groups run: income signals,
//! investment vehicles, insurance, loans, everyday expenses, transfer
//! methods, cash withdrawal (with city split), taxes, fees & charges,
//! miscellaneous. Overlapping keywords across groups ("rent", "gift") are
//! resolved by this order plus sign constraints, so reordering changes
//! outcomes. Keyword contents are tunable; the group order is not.

use crate::engine::{CategoryRule, Matcher, SignConstraint, SubClassifier, SubEntry};

fn contains(words: &[&str]) -> Vec<Matcher> {
    words.iter().map(|w| Matcher::Contains((*w).to_string())).collect()
}

fn rule(category: &str, sign: SignConstraint, words: &[&str]) -> CategoryRule {
    CategoryRule {
        category: category.to_string(),
        sign,
        matchers: contains(words),
        sub: None,
    }
}

fn city(label: &str, words: &[&str]) -> SubEntry {
    SubEntry { label: label.to_string(), matchers: contains(words) }
}

pub fn builtin_rules() -> Vec<CategoryRule> {
    use SignConstraint::{CreditOnly, DebitOnly, Either};

    let mut rules = Vec::with_capacity(64);

    // ── Income signals ───────────────────────────────────────────────────────
    rules.push(rule("Income - Salary", CreditOnly, &[
        "salary", "sal credit", "payroll", "stipend", "wages",
    ]));
    rules.push(rule("Income - Rental", CreditOnly, &[
        "rent received", "rental income", "rent credited", "lease rent", "rent",
    ]));
    rules.push(rule("Income - Interest", CreditOnly, &[
        "interest credit", "int.pd", "int pd", "savings interest", "fd interest",
        "interest paid", "interest",
    ]));
    rules.push(rule("Income - Refunds", CreditOnly, &[
        "refund", "cashback", "reversal", "chargeback",
    ]));
    rules.push(rule("Income - Dividends", CreditOnly, &[
        "dividend", "div cr", "ach c-", "interim div",
    ]));
    rules.push(rule("Income - Gifts & Transfers", CreditOnly, &[
        "gift", "received from", "shagun",
    ]));

    // ── Investment vehicles ──────────────────────────────────────────────────
    rules.push(rule("Investment - Digital Gold", Either, &[
        "digital gold", "safegold", "mmtc-pamp", "augmont",
    ]));
    rules.push(rule("Investment - Bonds", Either, &[
        "sovereign gold bond", "sgb", "rbi bond", "t-bill", "treasury bill", "ncd", "bond",
    ]));
    rules.push(rule("Investment - Stocks", Either, &[
        "zerodha", "groww", "upstox", "angel one", "icici direct", "5paisa", "demat",
        "equity", "kite",
    ]));
    rules.push(rule("Investment - Mutual Funds", Either, &[
        "mutual fund", "mf sip", "sip", "bse limited", "indian clearing", "nse clearing",
        "folio",
    ]));
    rules.push(rule("Investment - Fixed Deposit", Either, &[
        "fixed deposit", "fd booked", "fd closure", "term deposit", "recurring deposit",
        "rd installment",
    ]));
    rules.push(rule("Investment - Retirement", Either, &[
        "ppf", "nps", "epf", "provident fund", "pension fund", "atal pension",
    ]));
    rules.push(rule("Investment - Gold & Silver", Either, &[
        "gold purchase", "silver purchase", "bullion", "gold coin", "jeweller", "tanishq",
    ]));
    rules.push(rule("Investment - Crypto", Either, &[
        "crypto", "bitcoin", "btc", "ethereum", "wazirx", "coindcx", "coinswitch",
        "binance", "coinbase",
    ]));
    rules.push(rule("Investment - P2P Lending", Either, &[
        "p2p", "faircent", "lendenclub", "liquiloans", "12% club",
    ]));
    rules.push(rule("Investment - General", Either, &[
        "investment", "invest",
    ]));

    // ── Insurance ────────────────────────────────────────────────────────────
    rules.push(rule("Insurance - Life", Either, &[
        "lic of india", "lic premium", "life insurance", "term plan", "hdfc life",
        "sbi life", "max life", "icici pru life",
    ]));
    rules.push(rule("Insurance - Health", Either, &[
        "health insurance", "mediclaim", "star health", "niva bupa", "care health",
        "aditya birla health",
    ]));
    rules.push(rule("Insurance - Vehicle", Either, &[
        "motor insurance", "vehicle insurance", "car insurance", "two wheeler insurance",
        "acko", "go digit",
    ]));
    rules.push(rule("Insurance - General", Either, &[
        "insurance", "policy premium", "policybazaar", "renewal premium",
    ]));

    // ── Loans ────────────────────────────────────────────────────────────────
    rules.push(rule("Loan - Home", Either, &[
        "home loan", "housing loan", "hdfc ltd", "lichfl", "housing fin",
    ]));
    rules.push(rule("Loan - Personal", Either, &[
        "personal loan", "pl emi", "consumer loan",
    ]));
    rules.push(rule("Loan - Vehicle", Either, &[
        "car loan", "auto loan", "vehicle loan", "two wheeler loan",
    ]));
    rules.push(rule("Loan - Education", Either, &[
        "education loan", "student loan",
    ]));
    // Bare "emi" is a substring of "premium"; keep it delimiter-anchored.
    rules.push(rule("Loan - EMI", Either, &[
        " emi", "emi/", "emi-", "emi@", "loan", "bajaj fin", "ecs debit",
    ]));

    // ── Everyday expenses ────────────────────────────────────────────────────
    rules.push(rule("Expenses - Food & Dining", Either, &[
        "swiggy", "zomato", "blinkit", "zepto", "bigbasket", "instamart", "dominos",
        "mcdonald", "kfc", "pizza", "restaurant", "cafe", "starbucks", "barbeque",
        "biryani", "eatsure", "dunkin", "food",
    ]));
    rules.push(rule("Expenses - Shopping", Either, &[
        "amazon", "flipkart", "myntra", "ajio", "nykaa", "meesho", "snapdeal",
        "tatacliq", "shoppers stop", "westside", "zudio", "decathlon", "ikea", "croma",
        "reliance digital", "lifestyle", "pantaloons", "shopping",
    ]));
    rules.push(rule("Expenses - Entertainment", Either, &[
        "netflix", "prime video", "hotstar", "disney", "sonyliv", "zee5", "spotify",
        "youtube", "bookmyshow", "pvr", "inox", "cinema", "movie", "playstation",
        "xbox", "steam games",
    ]));
    rules.push(rule("Expenses - Transport", Either, &[
        "uber", "olacabs", "ola cabs", "ola money", "rapido", "namma metro", "dmrc",
        "bmrcl", "fastag", "petrol",
        "diesel", "fuel", "hpcl", "bpcl", "indian oil", "parking", "toll",
    ]));
    rules.push(rule("Expenses - Healthcare", Either, &[
        "pharmacy", "apollo", "medplus", "netmeds", "pharmeasy", "1mg", "hospital",
        "clinic", "diagnostic", "lab test", "practo", "dental", "medical",
    ]));
    rules.push(rule("Expenses - Education", Either, &[
        "udemy", "coursera", "byjus", "unacademy", "vedantu", "school fee", "tuition",
        "college fee", "university", "exam fee",
    ]));
    rules.push(rule("Expenses - Utilities", Either, &[
        "electricity", "bescom", "tneb", "msedcl", "water bill", "gas bill", "indane",
        "hp gas", "bharat gas", "broadband", "wifi", "internet bill", "dth", "tata play",
        "postpaid", "bill payment", "bbps", "billdesk",
    ]));
    rules.push(rule("Expenses - Travel", Either, &[
        "irctc", "makemytrip", "goibibo", "yatra", "cleartrip", "ixigo", "oyo", "airbnb",
        "indigo", "spicejet", "air india", "vistara", "flight", "hotel", "booking.com",
        "redbus", "ksrtc", "msrtc",
    ]));
    rules.push(rule("Expenses - Gifts & Donations", Either, &[
        "donation", "charity", "giveindia", "ketto", "milaap", " ngo ", "temple trust",
        "relief fund",
    ]));
    rules.push(rule("Expenses - Home Maintenance", Either, &[
        "urban company", "urbanclap", "plumber", "electrician", "carpenter",
        "pest control", "society maintenance", "apartment maintenance", "repair",
    ]));
    rules.push(rule("Expenses - Rent & Housing", DebitOnly, &[
        "rent paid", "house rent", "nobroker", "nestaway", "rent",
    ]));
    rules.push(rule("Expenses - Personal Care", Either, &[
        "salon", "spa ", "barber", "haircut", "lakme", "vlcc", "grooming",
    ]));

    // ── Transfer methods ─────────────────────────────────────────────────────
    rules.push(rule("Transfer - UPI Received", CreditOnly, &["upi"]));
    rules.push(rule("Transfer - UPI Sent", DebitOnly, &["upi"]));
    rules.push(rule("Transfer - Bank", Either, &[
        "neft", "imps", "rtgs", "fund transfer", "trf to", "trf from",
    ]));

    // ── Cash withdrawal, split by city ───────────────────────────────────────
    rules.push(CategoryRule {
        category: "Cash Withdrawal - ATM".to_string(),
        sign: DebitOnly,
        // "atm" is a substring of "treatment"; anchor it on a delimiter.
        matchers: contains(&[
            "atm ", " atm", "nwd", "cash withdrawal", "cash wdl", "csh wdl", "self cheque",
        ]),
        sub: Some(SubClassifier {
            prefix: "Cash Withdrawal".to_string(),
            entries: vec![
                city("Bangalore", &["bangalore", "bengaluru", "blr"]),
                city("Mumbai", &["mumbai", "bombay"]),
                city("Delhi", &["delhi", "new delhi"]),
                city("Chennai", &["chennai", "madras"]),
                city("Hyderabad", &["hyderabad", "secunderabad"]),
                city("Pune", &["pune"]),
                city("Kolkata", &["kolkata", "calcutta"]),
                city("Ahmedabad", &["ahmedabad"]),
                city("Jaipur", &["jaipur"]),
            ],
        }),
    });

    // ── Taxes ────────────────────────────────────────────────────────────────
    rules.push(rule("Taxes", Either, &[
        "income tax", "advance tax", "self assessment tax", "tds", "gst", "tin 2.0",
        "property tax",
    ]));

    // ── Fees & charges ───────────────────────────────────────────────────────
    rules.push(rule("Fees & Charges", Either, &[
        "charges", "chrg", "penalty", "annual fee", "amc fee", "sms alert",
        "min bal", "late fee", "processing fee",
    ]));

    // ── Miscellaneous ────────────────────────────────────────────────────────
    rules.push(rule("Subscriptions", Either, &[
        "subscription", "membership", "renewal", "adobe", "microsoft 365", "google one",
        "icloud", "notion", "canva",
    ]));
    rules.push(rule("Fitness", Either, &[
        "gym", "cult.fit", "cultfit", "fitness", "yoga", "crossfit", "healthifyme",
    ]));
    rules.push(rule("Communication", Either, &[
        "airtel", "jio", "vodafone", "vi recharge", "bsnl", "mobile recharge",
        "recharge", "prepaid",
    ]));
    rules.push(rule("Wallet & Payments", Either, &[
        "paytm", "phonepe", "gpay", "google pay", "amazon pay", "mobikwik",
        "freecharge", "razorpay", "payu", "ccavenue", "cashfree", "wallet",
    ]));

    rules
}
