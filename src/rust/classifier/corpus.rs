use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::category::Category;
use super::error::ClassifierError;

/// A text transformation used to synthesize extra training examples from a
/// small hand-written corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Augmentation {
    /// The example unchanged
    Identity,
    /// The example lower-cased
    Lowercase,
    /// The first half of the example's words
    FirstHalf,
    /// The remaining words after the first half
    SecondHalf,
}

impl Augmentation {
    /// The augmentation strategies applied when none are configured.
    pub const DEFAULT: [Augmentation; 4] = [
        Augmentation::Identity,
        Augmentation::Lowercase,
        Augmentation::FirstHalf,
        Augmentation::SecondHalf,
    ];

    /// Applies the transformation. Returns `None` when the result would be
    /// empty, e.g. the second half of a one-word example.
    pub fn apply(self, text: &str) -> Option<String> {
        let out = match self {
            Augmentation::Identity => text.to_string(),
            Augmentation::Lowercase => text.to_lowercase(),
            Augmentation::FirstHalf | Augmentation::SecondHalf => {
                let words: Vec<&str> = text.split_whitespace().collect();
                let mid = words.len() / 2;
                let half = if self == Augmentation::FirstHalf {
                    &words[..mid]
                } else {
                    &words[mid..]
                };
                half.join(" ")
            }
        };
        if out.trim().is_empty() {
            None
        } else {
            Some(out)
        }
    }
}

/// Example documents for every category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainingCorpus {
    documents: BTreeMap<Category, Vec<String>>,
}

impl Default for TrainingCorpus {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TrainingCorpus {
    /// Creates an empty corpus.
    pub fn new() -> Self {
        Self {
            documents: BTreeMap::new(),
        }
    }

    /// The hand-written corpus shipped with the crate.
    pub fn builtin() -> Self {
        let mut corpus = Self::new();
        for category in Category::ALL {
            corpus.documents.insert(
                category,
                builtin_documents(category).iter().map(|d| d.to_string()).collect(),
            );
        }
        corpus
    }

    /// Reads a corpus from a JSON file shaped like
    /// `{"invoice": ["...", "..."], "letter": ["..."]}`.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::BuildError(format!("Failed to read corpus {:?}: {}", path, e))
        })?;
        let corpus: TrainingCorpus = serde_json::from_str(&raw).map_err(|e| {
            ClassifierError::BuildError(format!("Failed to parse corpus {:?}: {}", path, e))
        })?;
        info!(
            "Loaded corpus from {:?} ({} examples)",
            path,
            corpus.len()
        );
        corpus.validate()?;
        Ok(corpus)
    }

    /// Adds examples for a category, appending to any it already has.
    pub fn add_examples(&mut self, category: Category, examples: Vec<impl Into<String>>) {
        self.documents
            .entry(category)
            .or_default()
            .extend(examples.into_iter().map(Into::into));
    }

    pub fn examples(&self, category: Category) -> &[String] {
        self.documents
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of examples across categories.
    pub fn len(&self) -> usize {
        self.documents.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that every category has at least one example and that no
    /// example is blank.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        for category in Category::ALL {
            let examples = self.examples(category);
            if examples.is_empty() {
                return Err(ClassifierError::ValidationError(format!(
                    "Category '{}' must have at least one example",
                    category.key()
                )));
            }
            if let Some(pos) = examples.iter().position(|e| e.trim().is_empty()) {
                return Err(ClassifierError::ValidationError(format!(
                    "Example {} of category '{}' cannot be empty",
                    pos + 1,
                    category.key()
                )));
            }
        }
        Ok(())
    }

    /// Expands every example through each strategy, in category order and
    /// then strategy order. With no strategies the examples are used as-is.
    pub fn augmented(&self, strategies: &[Augmentation]) -> (Vec<String>, Vec<Category>) {
        let mut texts = Vec::new();
        let mut labels = Vec::new();
        for (category, examples) in &self.documents {
            for example in examples {
                if strategies.is_empty() {
                    texts.push(example.clone());
                    labels.push(*category);
                    continue;
                }
                for strategy in strategies {
                    if let Some(variant) = strategy.apply(example) {
                        texts.push(variant);
                        labels.push(*category);
                    }
                }
            }
        }
        debug!(
            "Augmented {} examples into {} training documents",
            self.len(),
            texts.len()
        );
        (texts, labels)
    }

    /// SHA-256 over the corpus contents, hex encoded.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for (category, examples) in &self.documents {
            hasher.update(category.key().as_bytes());
            hasher.update([0u8]);
            for example in examples {
                hasher.update(example.as_bytes());
                hasher.update([b'\n']);
            }
        }
        format!("{:x}", hasher.finalize())
    }
}

fn builtin_documents(category: Category) -> &'static [&'static str] {
    match category {
        Category::Resume => &[
            "John Doe Software Engineer Email: john@email.com PROFESSIONAL SUMMARY Results-driven software engineer with 5 years experience WORK EXPERIENCE Senior Engineer at Tech Corp 2020-Present Developed microservices Led team of 4 engineers EDUCATION Bachelor of Science in Computer Science University 2018 GPA 3.8 SKILLS Python JavaScript React Docker AWS SQL",
            "Sarah Johnson Marketing Manager PROFESSIONAL PROFILE Creative marketing professional EXPERIENCE Marketing Manager Brand Solutions 2019-Present Managed 2M budget Increased lead generation 150 percent MBA in Marketing 2017 CERTIFICATIONS Google Analytics Certified",
            "Michael Chen Data Scientist SUMMARY Data scientist specializing in machine learning PROFESSIONAL EXPERIENCE Senior Data Scientist AI Solutions 2021-Present Built ML models 95 percent accuracy MS in Data Science 2019 TECHNICAL SKILLS Machine Learning Deep Learning NLP",
            "Emily Rodriguez Project Manager Professional Experience Project Manager Innovation Labs 2019-Present Successfully delivered 15 projects Managed teams of 20 members Certifications PMP Scrum Master Education MBA Project Management",
            "David Kim Financial Analyst Work History Financial Analyst Goldman Sachs 2020-Present Financial modeling forecasting Bachelor Business Administration Finance 2019 Technical Skills Excel SQL Python Tableau",
            "Lisa Chang UX Designer Creative designer passionate about user-centered design Senior UX Designer Airbnb 2021-Present Led mobile app redesign improving engagement 45 percent BFA Graphic Design Tools Figma Sketch Adobe",
            "CURRICULUM VITAE James Wilson PhD Candidate Research Experience Graduate Research Assistant MIT 2020-Present Published 5 peer-reviewed papers Education PhD Computer Science MIT 2019-2025 MS Computer Science Stanford 2019 Skills Research Python TensorFlow Publications",
            "Resume Amanda Martinez Registered Nurse RN Professional Summary Compassionate healthcare professional 8 years experience Clinical Experience Staff Nurse General Hospital 2016-Present Patient care Medication administration Education BSN Nursing University 2015 Certifications ACLS BLS",
            "CV Thomas Anderson Mechanical Engineer PE Work Experience Senior Engineer Boeing 2018-Present Aircraft systems design CAD modeling Education Bachelor Mechanical Engineering Purdue 2017 Professional Engineer License Technical Skills SolidWorks MATLAB FEA",
            "RESUME Maria Garcia HR Manager Professional Experience Human Resources Manager Tech Startup 2019-Present Recruitment Employee relations Benefits administration Education MBA Human Resources Management Skills Talent Acquisition Performance Management HRIS",
            "Career Profile Robert Lee Sales Director Professional Background Regional Sales Director Fortune 500 Company 2017-Present Team leadership Revenue growth CRM management Education BBA Marketing State University Skills Salesforce Negotiation Territory Management",
            "Professional Resume Jessica Taylor Graphic Designer Creative Professional Portfolio: jessicataylor.design Experience Senior Designer Creative Agency 2018-Present Brand identity Web design Print media Education BFA Graphic Design Art Institute Tools Adobe Creative Suite",
            "Alex Morgan Backend Developer alex.morgan@mail.com PROFESSIONAL SUMMARY Backend developer with 6 years building distributed systems WORK EXPERIENCE Staff Developer at Northwind Labs 2019-Present Designed event pipelines Mentored five engineers EDUCATION BSc Computer Science State University 2017 SKILLS Rust Go Kafka Kubernetes PostgreSQL",
            "Priya Natarajan Product Marketing Lead PROFILE Marketing professional focused on launches EXPERIENCE Product Marketing Lead Brightwave 2020-Present Owned launch budget of 1.5M Grew qualified pipeline 120 percent EDUCATION MBA Marketing 2018 CERTIFICATIONS HubSpot Inbound Google Ads",
            "Daniel Okafor Machine Learning Engineer SUMMARY Engineer specializing in ranking models PROFESSIONAL EXPERIENCE Senior ML Engineer Searchly 2021-Present Shipped recommendation models serving 10M users EDUCATION MS Statistics 2019 TECHNICAL SKILLS PyTorch Spark Feature Engineering",
            "CURRICULUM VITAE Helena Brandt PhD Research Experience Postdoctoral Fellow Institute of Genomics 2021-Present Published 9 peer-reviewed papers Education PhD Molecular Biology 2020 Teaching Assistant Cell Biology Skills CRISPR Sequencing Python Publications Conference Talks",
            "RESUME Marcus Lee Registered Nurse Professional Summary Critical care nurse 7 years experience Clinical Experience ICU Staff Nurse City Medical Center 2017-Present Patient assessment Ventilator management Education BSN Nursing 2016 Certifications ACLS PALS BLS",
            "Sofia Alvarez Civil Engineer Employment History Project Engineer Harbor Construction 2018-Present Managed bridge retrofit projects Site inspections Education Bachelor Civil Engineering 2017 Licenses Professional Engineer Skills AutoCAD Civil 3D Structural Analysis",
            "Career Objective Seeking a senior accounting role Jordan Price CPA Work Experience Senior Accountant Meridian Holdings 2016-Present Month-end close Consolidations Audit support Education BBA Accounting 2015 Qualifications Certified Public Accountant Skills NetSuite Excel GAAP",
            "Professional Resume Yuki Tanaka Illustrator Portfolio yukitanaka.art Experience Lead Illustrator Paper Lantern Studio 2019-Present Children's book illustration Character design Education BFA Illustration 2018 Tools Procreate Photoshop References available upon request",
        ],
        Category::Invoice => &[
            "INVOICE INV-2024-001 Bill To ABC Corporation Date November 16 2024 Due Date December 16 2024 Description Quantity Unit Price Amount Web Development Services 40 150 6000 Subtotal 7200 Tax 612 Total 7812 Payment Terms Net 30",
            "INVOICE Number 2024-11-789 From Design Studio Pro To XYZ Enterprises Item Qty Rate Total Logo Design 1 2500 2500 Subtotal 4500 Sales Tax 384 Total Amount Due 4434",
            "TAX INVOICE 2024-Q4-5678 Vendor Tech Solutions Customer Global Systems Products Software License 12000 Subtotal 18500 Tax 1538 TOTAL DUE 20188",
            "BILLING STATEMENT Account 98765 Previous Balance 2500 Payments 2500 New Charges 3200 Current Balance 3200 Professional Services 40 hrs 80 3200 Due Date 11/30/2024",
            "RECEIPT Order 55443 Customer Tech Startup Items Website Hosting Premium 1200 SSL Certificate 100 Subtotal 1315 Total Paid 1341 Payment Visa 4567",
            "PROFORMA INVOICE No PI-2024-556 Issued November 2024 Seller: Manufacturing Co Buyer: Retail Store Products Widget A Quantity 500 Unit Price 25 12500 Widget B Quantity 300 Unit Price 40 12000 Gross Total 24500 Discount 5 percent 1225 Net Total 23275 VAT 20 percent 4655 Grand Total 27930 Valid Until December 31 2024",
            "SALES INVOICE Invoice 78901 Date 11/15/2024 Sold To: Construction Company Description Hours Rate Amount Consulting Services 80 125 10000 Materials 5000 Equipment Rental 3000 Subtotal 18000 Sales Tax 8.5 percent 1530 Total Amount 19530 Payment Due 30 Days Terms Net 30",
            "MONTHLY INVOICE Account No 445566 Billing Period October 2024 Service Description Charges Internet Service 99.99 Phone Service 49.99 Cloud Storage 19.99 Total Current Charges 169.97 Previous Balance 0.00 Payments Received 0.00 Amount Due 169.97 Due Date November 30 2024",
            "COMMERCIAL INVOICE Invoice No CI-2024-8899 Exporter Import Export LLC Consignee Global Trading Corp Commodity Electronics Quantity 1000 units Value 50000 USD Freight Charges 2500 Insurance 500 Total Invoice Value 53000 Payment Terms Letter of Credit Incoterms FOB",
            "RENT INVOICE Tenant John Smith Property 123 Main St Apartment 4B Rent Period December 2024 Monthly Rent 2000 Parking Fee 100 Utilities 150 Late Fee 0 Total Amount Due 2250 Due Date December 1 2024 Payment Methods Check Direct Deposit",
            "CATERING INVOICE Event Wedding Reception Date November 20 2024 Items Guest Count 150 Cost per Person 75 Food Service 11250 Bar Service Open Bar 3500 Service Charge 15 percent 2213 Subtotal 16963 Gratuity 18 percent 3053 Total Amount 20016 Deposit Paid 5000 Balance Due 15016",
            "INVOICE INV-2025-014 Bill To Redwood Analytics Issue Date March 3 2025 Due Date April 2 2025 Description Quantity Unit Price Amount Data Pipeline Consulting 32 140 4480 Subtotal 4480 Tax 380 Total Due 4860 Payment Terms Net 30",
            "INVOICE Number 88-4521 From Pixel Forge Studio To Lumen Retail Item Qty Rate Total Brand Refresh 1 3200 3200 Social Templates 10 45 450 Subtotal 3650 Sales Tax 292 Amount Due 3942",
            "TAX INVOICE TI-7781 Supplier Cloudnine Software Customer Vertex Logistics Annual License 9600 Onboarding 1200 Subtotal 10800 GST 1080 TOTAL DUE 11880 Bank Transfer Reference TI-7781",
            "BILLING STATEMENT Account 44120 Previous Balance 1800 Payments Received 1800 New Charges 2150 Current Balance 2150 Support Hours 25 hrs 86 2150 Balance Due by 05/15/2025",
            "RECEIPT Order 99310 Customer Harbor Cafe Items Espresso Machine Service 320 Replacement Gaskets 45 Subtotal 365 Tax 29 Total Paid 394 Paid by Mastercard 8821",
            "PROFORMA INVOICE PI-3390 Seller Alpine Textiles Buyer Fjord Outfitters Wool Jackets Quantity 200 Unit Price 85 17000 Fleece Liners Quantity 150 Unit Price 22 3300 Net Total 20300 VAT 20 percent 4060 Grand Total 24360 Valid Until June 30 2025",
            "MONTHLY INVOICE Account No 20931 Billing Period May 2025 Fiber Internet 79.00 Mobile Plan 35.00 Device Installment 41.50 Total Current Charges 155.50 Amount Due 155.50 Due Date June 20 2025 Late Fee Applies After Due Date",
            "COMMERCIAL INVOICE CI-5512 Exporter Delta Components Ltd Consignee Pacific Assembly Corp Goods Circuit Boards Quantity 5000 units Value 62500 USD Freight 1800 Insurance 350 Total Invoice Value 64650 Incoterms CIF Payment Terms Letter of Credit",
        ],
        Category::Contract => &[
            "SERVICE AGREEMENT entered November 2024 BETWEEN Client ABC Corporation AND Service Provider Tech Solutions SCOPE OF SERVICES Web application development TERM twelve months COMPENSATION 50000 CONFIDENTIALITY TERMINATION 30 days GOVERNING LAW California",
            "EMPLOYMENT CONTRACT effective January 2025 BETWEEN Tech Innovations Employer AND Jane Smith Employee POSITION Senior Software Engineer COMPENSATION Salary 120000 Bonus 20 percent BENEFITS Health insurance 401k 20 days paid time NON-COMPETE 12 months",
            "NON-DISCLOSURE AGREEMENT between Company A Disclosing Party Company B Receiving Party Confidential Information trade secrets business plans customer data Obligations not disclose Term 3 years Remedies injunctive relief damages",
            "CONSULTING AGREEMENT Independent Contractor between Client XYZ Consultant ABC Services Strategic planning market analysis Compensation 10000 per month Term 6 months Intellectual Property work product belongs Client Termination 30 days notice",
            "LEASE AGREEMENT This Lease dated November 1 2024 BETWEEN Landlord Property Management LLC TENANT Sarah Williams PREMISES 456 Oak Street Unit 2B Term 12 months commencing December 1 2024 RENT 1800 monthly due first of month SECURITY DEPOSIT 3600 UTILITIES Tenant responsible electric gas PETS Not permitted MAINTENANCE Landlord responsible major repairs TERMINATION 60 days written notice",
            "PURCHASE AGREEMENT Agreement dated November 15 2024 SELLER Manufacturing Corp BUYER Distribution Inc GOODS Industrial Equipment Model X500 QUANTITY 50 units PRICE 5000 per unit Total 250000 DELIVERY FOB Seller warehouse within 30 days PAYMENT 50 percent deposit balance upon delivery WARRANTY 2 years parts labor GOVERNING LAW State of Texas",
            "PARTNERSHIP AGREEMENT Partners John Doe Jane Smith effective December 2024 BUSINESS NAME Tech Ventures LLC PURPOSE Software development consulting CAPITAL CONTRIBUTION John 100000 Jane 100000 PROFIT SHARING 50 percent each MANAGEMENT Decisions require unanimous consent DISSOLUTION Requires 60 days notice DISPUTE RESOLUTION Binding arbitration",
            "SOFTWARE LICENSE AGREEMENT Licensor Software Corp Licensee Business User GRANT OF LICENSE Non-exclusive non-transferable license TERM Perpetual FEES One-time 10000 annual maintenance 2000 RESTRICTIONS No reverse engineering No redistribution SUPPORT Email support business hours Updates included WARRANTY As-is LIMITATION OF LIABILITY Not exceed fees paid",
            "INDEPENDENT CONTRACTOR AGREEMENT Client Marketing Agency Contractor Freelance Designer SERVICES Graphic design brand identity DELIVERABLES Logo mockups Style guide TIMELINE 30 days PROJECT FEE 5000 milestone payments EXPENSES Reimbursable with receipts OWNERSHIP Client owns all work product CONFIDENTIALITY Non-disclosure required TERMINATION Either party 14 days notice",
            "FRANCHISE AGREEMENT Franchisor Restaurant Chain Inc Franchisee Owner Operator LLC GRANT Franchise to operate restaurant TERRITORY Exclusive rights City limits TERM 10 years renewable INITIAL FEE 50000 ROYALTY 6 percent gross sales TRAINING Required 4 weeks STANDARDS Must follow operating procedures TERMINATION Breach allows immediate termination",
            "SERVICE AGREEMENT entered April 2025 BETWEEN Client Orchard Health AND Provider Beacon Systems SCOPE OF SERVICES Maintenance of patient portal TERM eighteen months FEES 7500 per month CONFIDENTIALITY TERMINATION 60 days written notice GOVERNING LAW New York",
            "EMPLOYMENT CONTRACT effective July 2025 BETWEEN Lattice Robotics Employer AND Omar Haddad Employee POSITION Controls Engineer SALARY 115000 annually BENEFITS Medical dental 401k 25 days leave NON-SOLICITATION 12 months after separation",
            "MUTUAL NON-DISCLOSURE AGREEMENT between Quartz Media Disclosing Party and Helix Partners Receiving Party Confidential Information includes source code pricing and roadmaps Obligations restrict use to evaluation Term 5 years Remedies equitable relief",
            "CONSULTING AGREEMENT Independent Contractor between Summit Foods Client and Rivera Advisory Consultant Services supply chain review Compensation 12000 per month Term 4 months Work product assigned to Client Either party may terminate on 15 days notice",
            "RESIDENTIAL LEASE AGREEMENT dated February 1 2025 Landlord Maple Property Group Tenant Chris Walker Premises 88 Birch Lane Unit 3 Term 12 months Rent 2100 due monthly Security Deposit 4200 Tenant pays utilities Pets require written consent Termination 60 days notice",
            "ASSET PURCHASE AGREEMENT Seller Greenline Manufacturing Buyer Northgate Industries Assets production equipment inventory Purchase Price 1850000 Closing on or before September 30 2025 Representations and Warranties Indemnification survives closing Governing Law Delaware",
            "SOFTWARE LICENSE AGREEMENT Licensor Stackwise Inc Licensee Horizon Bank Grant of a non-exclusive non-transferable license Term three years Fees 48000 annually Restrictions no sublicensing no reverse engineering Limitation of Liability capped at fees paid",
            "PARTNERSHIP AGREEMENT WHEREAS the parties wish to form Cedar Ventures LLC NOW THEREFORE the parties hereby agree Capital Contributions 150000 each Profit Sharing equal shares Management by unanimous consent Dispute Resolution binding arbitration Breach permits dissolution",
        ],
        Category::Letter => &[
            "Dear Mr Johnson I am writing to express sincere gratitude for interview opportunity Software Engineer position impressed by team innovative approach Thank you again Sincerely Sarah Williams",
            "Dear Valued Customer Subject Important Update Service Terms We hope this finds you well inform upcoming changes Enhanced security Expanded support hours New pricing We value your business Best regards Michael Chen",
            "Dear Hiring Manager excited to apply Marketing Director position 8 years experience digital marketing led campaigns generating 5M revenue expertise SEO SEM content strategy social media Please find resume attached Thank you Jennifer Martinez",
            "Dear Dr Smith Thank you for seeing me regarding annual physical appreciate thoroughness will schedule follow-up blood work make lifestyle changes discussed Looking forward next appointment Robert Johnson",
            "Dear Members Board of Directors I am pleased to present quarterly update operations Following successful product launch revenue exceeded projections by 15 percent Customer satisfaction remains high 92 percent Looking ahead expanding into new markets Respectfully submitted CEO Williams",
            "Dear Parents Welcome back to school year We are excited to begin another year learning growth This year introducing new STEM curriculum enhanced arts program Parent-teacher conferences scheduled October Please mark calendars Looking forward to wonderful year Principal Anderson Elementary School",
            "Dear Homeowner Association members This letter serves as notice upcoming special assessment roof repairs estimated cost 50000 divided among 25 units 2000 per unit Payment due January 15 2025 Board has obtained multiple bids selected qualified contractor Questions contact management office Sincerely HOA Board",
            "Dear Policy Holder This confirms receipt your claim number CL-2024-8899 filed November 10 2024 Adjuster will contact you within 3 business days inspect damage Please retain all receipts related repairs temporary housing Questions call claims department 800-555-0199 reference claim number Best regards Insurance Company Claims",
            "Dear Scholarship Committee I am writing to apply for merit scholarship academic year 2024-2025 Currently junior majoring Computer Science GPA 3.9 Active in student government volunteer tutoring program Financial assistance would allow me to continue studies without additional employment Attached find transcripts recommendation letters Thank you for consideration Sincerely Student Name",
            "Dear Colleague I wanted to personally reach out to inform you of my decision to resign from position Senior Manager effective December 31 2024 accepting opportunity Chief Operations Officer grateful for mentorship support over past 5 years wish continued success Happy to assist with transition Best wishes Former Manager Name",
            "Dear Ms Patel I am writing to thank you for the interview for the Operations Analyst position I enjoyed learning about your team and the new warehouse project Thank you again for your time Sincerely Ben Carter",
            "Dear Valued Customer Subject Changes to your account We wanted to let you know about upcoming improvements longer support hours and a refreshed mobile app We appreciate your loyalty Best regards Customer Care Team",
            "Dear Hiring Manager I am excited to apply for the Communications Manager role With nine years in public relations I have led campaigns for national nonprofits Please find my application attached Kind regards Nadia Rossi",
            "Dear Dr Nguyen Thank you for seeing me last Tuesday I appreciated your patience in explaining the treatment plan I will book the follow-up visit and begin the exercises we discussed Warm wishes Henry Blake",
            "Dear Parents and Guardians Welcome to the new school term We are delighted to introduce a robotics club and an expanded music program Family evenings are planned for October Please save the dates Warmly Principal Ortiz",
            "Dear Residents This letter is to inform you that the lobby will be repainted next week Elevators will remain in service Please pardon any inconvenience and contact the front desk with questions Yours truly Building Management",
            "To whom it may concern I am pleased to recommend Laura Kim who worked as my research assistant for two years She is dependable curious and thorough I recommend her without reservation Respectfully Professor Alan Hughes",
            "Dear Colleagues I wanted to share that I will be leaving the company at the end of the month to pursue a new opportunity It has been a privilege to work alongside all of you Yours faithfully Grace Liu",
        ],
        Category::Report => &[
            "QUARTERLY BUSINESS REPORT Q4 2024 Executive Summary analysis company performance Financial Performance Revenue 12.5M Net Profit 2.3M Key Findings Customer acquisition increased 35 percent Market Analysis competitive landscape Recommendations Increase investment R&D Conclusion performance exceeded targets",
            "TECHNICAL ANALYSIS REPORT Cloud Migration Assessment Introduction findings comprehensive assessment Methodology Infrastructure audit Performance benchmarking Cost Analysis Current 850K Projected cloud 620K 27 percent savings Recommendations phased approach Conclusion significant cost savings improved scalability",
            "MONTHLY SALES REPORT October 2024 Total sales 450K 12 percent increase New customers 145 retention 92 percent Regional Performance North 180K East 135K West 90K South 45K Top Products A 125K B 98K C 87K Action Items Increase marketing Hire 2 sales reps Launch new product Q1",
            "INCIDENT REPORT IR-2024-1156 November 15 2024 Time 14:30 Location Building A fire alarm activated conference room 301 Building evacuated 5 minutes Fire department 14:38 Cause overheated projector No fire injuries Damage 2500 Recommendations Install sensors quarterly inspections Update evacuation procedures",
            "ANNUAL PERFORMANCE REPORT Employee John Anderson Position Software Engineer Review Period January-December 2024 KEY ACCOMPLISHMENTS Delivered 8 major projects on time Led migration to microservices Mentored 3 junior developers PERFORMANCE RATINGS Technical Skills Excellent Communication Very Good Leadership Good GOALS 2025 Senior Engineer promotion Complete AWS certification Lead team of 5 OVERALL RATING Exceeds Expectations Recommended Salary Increase 8 percent",
            "MARKET RESEARCH REPORT Industry Smart Home Devices Date November 2024 EXECUTIVE SUMMARY Market size 95B growing 23 percent annually Major players Amazon Google Apple CONSUMER TRENDS Voice control most desired feature Security concerns remain Privacy priorities COMPETITIVE ANALYSIS Amazon leads 35 percent market share Google second 28 percent Apple third 18 percent RECOMMENDATIONS Focus on privacy features Integrate AI capabilities Expand product ecosystem",
            "PROJECT STATUS REPORT Project Website Redesign Status 65 percent complete Timeline On track Budget Under by 5K KEY MILESTONES Completed Design phase Development 80 percent Testing begins December RISKS Dependencies on third-party API Integration delays possible NEXT STEPS Complete backend development Begin user testing Prepare launch plan TEAM UPDATES Added 2 developers All team members meeting deadlines",
            "FINANCIAL AUDIT REPORT Company XYZ Corporation Audit Period Fiscal Year 2024 OPINION Financial statements present fairly material respects FINDINGS Internal controls adequate Revenue recognition appropriate Inventory valuation reasonable RECOMMENDATIONS Enhance documentation procedures Implement dual authorization Update accounting software MANAGEMENT RESPONSE Agrees with recommendations Implementation timeline 90 days AUDITOR Certified Public Accountants",
            "LABORATORY TEST REPORT Patient John Smith Date November 16 2024 Tests Ordered Complete Blood Count Lipid Panel Glucose RESULTS CBC Within normal ranges Cholesterol Total 195 LDL 115 HDL 55 Glucose Fasting 92 INTERPRETATION All values within normal limits No significant abnormalities detected RECOMMENDATIONS Continue current health regimen Retest in 12 months Physician Dr Sarah Johnson MD",
            "ENVIRONMENTAL IMPACT REPORT Project Commercial Development Site 123 Industrial Park SCOPE Air quality Water resources Wildlife habitat Traffic impact FINDINGS Minimal impact on air quality Storm water management adequate Protected species not present Traffic study shows acceptable levels MITIGATION MEASURES Install pollution controls Preserve 20 percent green space Create wildlife corridors CONCLUSION Project approved with conditions Public comment period 30 days",
            "QUARTERLY BUSINESS REPORT Q1 2025 Executive Summary review of company performance Financial Performance Revenue 8.2M Operating Margin 14 percent Key Findings churn decreased 3 points Market Analysis competitors raised prices Recommendations expand partner channel Conclusion quarter exceeded plan",
            "TECHNICAL ASSESSMENT REPORT Data Center Consolidation Introduction scope and objectives Methodology capacity audit latency benchmarking Cost Analysis current 1.2M projected 780K Findings three sites underutilized Recommendations consolidate to two regions Conclusion savings of 35 percent",
            "MONTHLY SALES REPORT March 2025 Total sales 620K up 9 percent New accounts 212 Retention 89 percent Regional Results West 240K Central 190K East 150K South 40K Top Products Alpha Beta Gamma Action Items hire account executives",
            "INCIDENT REPORT IR-2025-031 Date April 9 2025 Location Warehouse 2 Loading Dock Forklift collision with racking No injuries reported Damage estimated 4800 Root Cause blind corner visibility Corrective Actions install mirrors retrain operators",
            "ANNUAL PERFORMANCE REVIEW REPORT Employee Nina Schultz Role Data Analyst Period January December 2024 Accomplishments automated weekly dashboards reduced reporting time 40 percent Ratings Technical Excellent Collaboration Strong Goals lead analytics guild Overall Rating Exceeds Expectations",
            "MARKET RESEARCH REPORT Electric Bicycles 2025 Executive Summary market valued at 38B growing 11 percent annually Consumer Survey results commuters value range and price Competitive Landscape three brands hold 52 percent share Recommendations target urban commuters",
            "PROJECT STATUS REPORT Mobile Banking Rebuild Status 70 percent complete Schedule on track Budget 3 percent under Milestones design complete API integration in progress Risks vendor delays Next Steps begin beta testing Team added two QA engineers",
            "LABORATORY ANALYSIS REPORT Sample Batch 4471 Received May 2 2025 Tests pH heavy metals microbial count Results pH 7.1 lead below detection limit coliforms absent Interpretation water meets regulatory standards Methodology EPA approved procedures Analyst signature",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_corpus_is_valid() {
        let corpus = TrainingCorpus::builtin();
        assert!(corpus.validate().is_ok());
        for category in Category::ALL {
            assert!(corpus.examples(category).len() >= 18);
        }
    }

    #[test]
    fn test_halves_split_on_words() {
        let text = "one two three four five";
        assert_eq!(Augmentation::FirstHalf.apply(text).as_deref(), Some("one two"));
        assert_eq!(
            Augmentation::SecondHalf.apply(text).as_deref(),
            Some("three four five")
        );
        assert_eq!(Augmentation::FirstHalf.apply("single"), None);
        assert_eq!(Augmentation::SecondHalf.apply("single").as_deref(), Some("single"));
    }

    #[test]
    fn test_default_augmentation_multiplies_examples() {
        let corpus = TrainingCorpus::builtin();
        let (texts, labels) = corpus.augmented(&Augmentation::DEFAULT);
        assert_eq!(texts.len(), corpus.len() * 4);
        assert_eq!(texts.len(), labels.len());

        let (plain, _) = corpus.augmented(&[]);
        assert_eq!(plain.len(), corpus.len());
    }

    #[test]
    fn test_validation_rejects_missing_category() {
        let mut corpus = TrainingCorpus::new();
        corpus.add_examples(Category::Invoice, vec!["Invoice total due"]);
        assert!(matches!(
            corpus.validate(),
            Err(ClassifierError::ValidationError(_))
        ));
    }

    #[test]
    fn test_digest_tracks_contents() {
        let a = TrainingCorpus::builtin();
        let mut b = TrainingCorpus::builtin();
        assert_eq!(a.digest(), b.digest());
        b.add_examples(Category::Letter, vec!["Dear friend, see you soon. Regards"]);
        assert_ne!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
    }

    #[test]
    fn test_json_round_trip_uses_lowercase_keys() {
        let mut corpus = TrainingCorpus::new();
        corpus.add_examples(Category::Report, vec!["Findings and conclusion"]);
        let json = serde_json::to_string(&corpus).unwrap();
        assert_eq!(json, r#"{"report":["Findings and conclusion"]}"#);
        let parsed: TrainingCorpus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, corpus);
    }
}
