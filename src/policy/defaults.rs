//! Default policy parameter schema
//!
//! Base-year (2013) statutory values. Vector parameters hold one component
//! per filing status (single, joint, separate, head-of-household, widow(er),
//! separate-living-apart) unless noted; EITC parameters hold one component
//! per count of qualifying children (0 through 3-or-more).

/// Schema entry for one policy parameter.
pub struct ParamDef {
    /// Parameter name, underscore-prefixed.
    pub name: &'static str,
    /// Components per year (1 for scalars).
    pub width: usize,
    /// Whether the value compounds with inflation by default.
    pub indexed: bool,
    /// Supplied leading-year rows, starting at the base year.
    pub rows: &'static [&'static [f64]],
}

/// The full default schema.
pub const DEFAULTS: &[ParamDef] = &[
    // Statutory marginal rates
    ParamDef { name: "_rt1", width: 1, indexed: false, rows: &[&[0.10]] },
    ParamDef { name: "_rt2", width: 1, indexed: false, rows: &[&[0.15]] },
    ParamDef { name: "_rt3", width: 1, indexed: false, rows: &[&[0.25]] },
    ParamDef { name: "_rt4", width: 1, indexed: false, rows: &[&[0.28]] },
    ParamDef { name: "_rt5", width: 1, indexed: false, rows: &[&[0.33]] },
    ParamDef { name: "_rt6", width: 1, indexed: false, rows: &[&[0.35]] },
    ParamDef { name: "_rt7", width: 1, indexed: false, rows: &[&[0.396]] },
    // Bracket thresholds by filing status
    ParamDef {
        name: "_brk1",
        width: 6,
        indexed: true,
        rows: &[&[8925.0, 17850.0, 8925.0, 12750.0, 17850.0, 8925.0]],
    },
    ParamDef {
        name: "_brk2",
        width: 6,
        indexed: true,
        rows: &[&[36250.0, 72500.0, 36250.0, 48600.0, 72500.0, 36250.0]],
    },
    ParamDef {
        name: "_brk3",
        width: 6,
        indexed: true,
        rows: &[&[87850.0, 146400.0, 73200.0, 125450.0, 146400.0, 73200.0]],
    },
    ParamDef {
        name: "_brk4",
        width: 6,
        indexed: true,
        rows: &[&[183250.0, 223050.0, 111525.0, 203150.0, 223050.0, 111525.0]],
    },
    ParamDef {
        name: "_brk5",
        width: 6,
        indexed: true,
        rows: &[&[398350.0, 398350.0, 199175.0, 398350.0, 398350.0, 199175.0]],
    },
    ParamDef {
        name: "_brk6",
        width: 6,
        indexed: true,
        rows: &[&[400000.0, 450000.0, 225000.0, 425000.0, 450000.0, 225000.0]],
    },
    // Standard deduction: six statuses plus the dependent-filer floor
    ParamDef {
        name: "_stded",
        width: 7,
        indexed: true,
        rows: &[&[6100.0, 12200.0, 6100.0, 8950.0, 12200.0, 6100.0, 1000.0]],
    },
    // Extra standard deduction for aged/blind: [single-ish, joint-ish]
    ParamDef { name: "_aged", width: 2, indexed: true, rows: &[&[1500.0, 1200.0]] },
    // Personal exemption and its phase-out start
    ParamDef { name: "_amex", width: 1, indexed: true, rows: &[&[3900.0]] },
    ParamDef {
        name: "_exmpb",
        width: 6,
        indexed: true,
        rows: &[&[200000.0, 300000.0, 150000.0, 250000.0, 300000.0, 150000.0]],
    },
    // Social Security benefit taxability thresholds
    ParamDef {
        name: "_ssb50",
        width: 6,
        indexed: false,
        rows: &[&[25000.0, 32000.0, 0.0, 25000.0, 25000.0, 0.0]],
    },
    ParamDef {
        name: "_ssb85",
        width: 6,
        indexed: false,
        rows: &[&[34000.0, 44000.0, 0.0, 34000.0, 34000.0, 0.0]],
    },
    // Payroll tax
    ParamDef { name: "_ssmax", width: 1, indexed: true, rows: &[&[113700.0]] },
    ParamDef { name: "_fica_trt", width: 1, indexed: false, rows: &[&[0.153]] },
    ParamDef { name: "_fica_ss_trt", width: 1, indexed: false, rows: &[&[0.124]] },
    ParamDef { name: "_fica_mc_trt", width: 1, indexed: false, rows: &[&[0.029]] },
    // Alternative minimum tax
    ParamDef {
        name: "_amtex",
        width: 6,
        indexed: true,
        rows: &[&[51900.0, 80750.0, 40375.0, 51900.0, 80750.0, 40375.0]],
    },
    ParamDef {
        name: "_amtys",
        width: 6,
        indexed: false,
        rows: &[&[112500.0, 150000.0, 75000.0, 112500.0, 150000.0, 75000.0]],
    },
    ParamDef { name: "_amtsep", width: 1, indexed: true, rows: &[&[232500.0]] },
    ParamDef { name: "_almsep", width: 1, indexed: true, rows: &[&[39375.0]] },
    ParamDef { name: "_almsp", width: 1, indexed: true, rows: &[&[179500.0]] },
    ParamDef { name: "_amtage", width: 1, indexed: false, rows: &[&[24.0]] },
    ParamDef { name: "_almdep", width: 1, indexed: true, rows: &[&[6950.0]] },
    // Long-term capital gains / qualified dividends
    ParamDef { name: "_cgrate1", width: 1, indexed: false, rows: &[&[0.0]] },
    ParamDef { name: "_cgrate2", width: 1, indexed: false, rows: &[&[0.15]] },
    // Net investment income surtax threshold
    ParamDef {
        name: "_thresx",
        width: 6,
        indexed: false,
        rows: &[&[200000.0, 250000.0, 125000.0, 200000.0, 250000.0, 125000.0]],
    },
    // Child and dependent care credit
    ParamDef { name: "_dcmax", width: 1, indexed: false, rows: &[&[3000.0]] },
    ParamDef { name: "_pcmax", width: 1, indexed: false, rows: &[&[35.0]] },
    ParamDef { name: "_agcmax", width: 1, indexed: false, rows: &[&[15000.0]] },
    // Child tax credit
    ParamDef { name: "_chmax", width: 1, indexed: false, rows: &[&[1000.0]] },
    ParamDef {
        name: "_cphase",
        width: 6,
        indexed: false,
        rows: &[&[75000.0, 110000.0, 55000.0, 75000.0, 75000.0, 55000.0]],
    },
    ParamDef { name: "_ealim", width: 1, indexed: false, rows: &[&[3000.0]] },
    ParamDef { name: "_adctcrt", width: 1, indexed: false, rows: &[&[0.15]] },
    // Earned income tax credit, by number of qualifying children
    ParamDef {
        name: "_crmax",
        width: 4,
        indexed: true,
        rows: &[&[487.0, 3250.0, 5372.0, 6044.0]],
    },
    ParamDef {
        name: "_rtbase",
        width: 4,
        indexed: false,
        rows: &[&[0.0765, 0.34, 0.40, 0.45]],
    },
    ParamDef {
        name: "_rtless",
        width: 4,
        indexed: false,
        rows: &[&[0.0765, 0.1598, 0.2106, 0.2106]],
    },
    ParamDef {
        name: "_ymax",
        width: 4,
        indexed: true,
        rows: &[&[7970.0, 17530.0, 17530.0, 17530.0]],
    },
    ParamDef { name: "_joint", width: 1, indexed: true, rows: &[&[5340.0]] },
    ParamDef { name: "_dylim", width: 1, indexed: true, rows: &[&[3300.0]] },
    // Education credits (phase-out starts expressed in thousands)
    ParamDef { name: "_edphhs", width: 1, indexed: false, rows: &[&[80.0]] },
    ParamDef { name: "_edphhm", width: 1, indexed: false, rows: &[&[160.0]] },
    ParamDef { name: "_learn", width: 1, indexed: false, rows: &[&[10000.0]] },
    // Itemized-deduction overall limitation start
    ParamDef {
        name: "_phase",
        width: 6,
        indexed: true,
        rows: &[&[250000.0, 300000.0, 150000.0, 275000.0, 300000.0, 150000.0]],
    },
    // Lump-sum head tax (off by default)
    ParamDef { name: "_lumpsum", width: 1, indexed: false, rows: &[&[0.0]] },
    // Flat AGI surtax (off by default)
    ParamDef { name: "_agi_surtax_rt", width: 1, indexed: false, rows: &[&[0.0]] },
    ParamDef {
        name: "_agi_surtax_thd",
        width: 6,
        indexed: false,
        rows: &[&[9e99, 9e99, 9e99, 9e99, 9e99, 9e99]],
    },
];

/// Look up a schema entry by name.
pub fn lookup(name: &str) -> Option<&'static ParamDef> {
    DEFAULTS.iter().find(|d| d.name == name)
}
