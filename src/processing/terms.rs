//! Fixed term tables shared by the decomposer, matcher, specificity analyzer
//! and exception rules.
//!
//! Every entry is stored in normalized form (see [`normalize`]) so it can be
//! compared directly against normalized résumé and keyword text.
//!
//! [`normalize`]: crate::processing::normalizer::normalize

use once_cell::sync::Lazy;
use regex::Regex;

/// Portuguese prepositions and contractions used to split requirement phrases.
pub const PREPOSITIONS: &[&str] = &[
    "para", "com", "de", "do", "da", "na", "no", "em", "a", "o", "as", "os", "ao", "aos", "pelo",
    "pela",
];

/// Conjunctions that separate coordinated requirements ("A e B", "A ou B").
pub const CONJUNCTIONS: &[&str] = &["e", "ou"];

/// Words that carry no requirement meaning on their own. Decomposition keeps
/// them, but they never count as match evidence.
pub const CONNECTOR_WORDS: &[&str] = &[
    "para", "com", "de", "do", "da", "dos", "das", "na", "no", "nas", "nos", "em", "a", "o", "as",
    "os", "ao", "aos", "pelo", "pela", "pelos", "pelas", "e", "ou", "um", "uma", "uns", "umas",
];

/// Known technical terms, some of them multi-word, that must survive
/// decomposition as a unit.
pub const TECHNICAL_TERMS: &[&str] = &[
    "aws", "azure", "gcp", "emr", "athena", "sagemaker", "lambda", "s3", "ec2", "rds", "dynamodb",
    "power bi", "tableau", "quicksight", "looker", "data studio", "metabase", "powerbi",
    "python", "r", "sql", "nosql", "spark", "hadoop", "java", "javascript", "typescript",
    "scrum", "kanban", "agile", "devops", "mlops", "dataops", "gitops",
    "product owner", "scrum master", "data scientist", "data analyst", "data engineer",
    "cloud", "docker", "kubernetes", "k8s", "container", "microservices",
];

/// "Qualifier + noun" shapes that mark a term as a specific version of a
/// shorter one.
static SPECIFIC_PATTERN_SOURCES: &[&str] = &[
    r"^[a-z]+ product owner$",
    r"^[a-z]+ scrum master$",
    r"^[a-z]+ project manager$",
    r"^cloud [a-z]+$",
    r"^banco [a-z]+$",
    r"^produtos de [a-z]+$",
    r"^servicos de [a-z]+$",
    r"^sistema de [a-z]+$",
    r"^plataforma de [a-z]+$",
    r"pos ?graduacao",
    r"^[a-z]+ bi$",
    r"^testes de [a-z]+$",
    r"^analise de [a-z]+$",
    r"^gestao de [a-z]+$",
];

pub static SPECIFIC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    SPECIFIC_PATTERN_SOURCES
        .iter()
        .map(|p| Regex::new(p).expect("Invalid specificity pattern"))
        .collect()
});

/// A generic term and the specific forms that must not be satisfied by it.
#[derive(Debug, Clone, Copy)]
pub struct SpecificFamily {
    pub generic: &'static str,
    pub specific: &'static [&'static str],
}

pub const SPECIFIC_FAMILIES: &[SpecificFamily] = &[
    SpecificFamily { generic: "cloud", specific: &["cloud aws", "aws cloud", "amazon web services"] },
    SpecificFamily {
        generic: "banco de dados",
        specific: &["sql server", "oracle", "mysql", "postgresql", "mongodb"],
    },
    SpecificFamily {
        generic: "framework",
        specific: &["react", "angular", "vue", "django", "spring", "laravel"],
    },
    SpecificFamily {
        generic: "linguagem",
        specific: &["java", "python", "javascript", "typescript", "php"],
    },
    SpecificFamily {
        generic: "devops",
        specific: &["jenkins", "gitlab ci", "github actions", "azure devops"],
    },
    SpecificFamily {
        generic: "product owner",
        specific: &["data product owner", "technical product owner", "digital product owner"],
    },
    SpecificFamily {
        generic: "gerente de projetos",
        specific: &["gerente de projetos digitais", "gerente de projetos de ti"],
    },
    SpecificFamily {
        generic: "analista",
        specific: &["analista de dados", "analista de sistemas", "analista de negocios"],
    },
    SpecificFamily {
        generic: "data",
        specific: &["data product", "data science", "data engineer", "data analyst"],
    },
];

/// Soft skills that may be inferred from looser indicator words.
pub const SOFT_SKILL_INDICATORS: &[(&str, &[&str])] = &[
    ("comunicador eficiente", &["comunicacao", "apresentacao", "storytelling", "negociacao"]),
    ("foco no cliente", &["cliente", "usuario", "ux", "experiencia do usuario", "design thinking"]),
    ("orientacao para resultados", &["resultado", "meta", "objetivo", "kpi", "okr", "performance"]),
    ("busca pela qualidade", &["qualidade", "melhoria continua", "excelencia", "otimizacao"]),
];

/// Language names the proficiency rule looks around.
pub const ENGLISH_MARKERS: &[&str] = &["ingles", "english"];

/// Proficiency words that satisfy an intermediate-level requirement.
pub const ADVANCED_PROFICIENCY: &[&str] = &["avancado", "fluente", "advanced", "fluent"];

/// Keyword fragments identifying an intermediate English requirement.
pub const INTERMEDIATE_ENGLISH: &[&str] =
    &["ingles intermediario", "intermediate english", "english intermediate"];

/// Résumé evidence of a completed higher-education degree.
pub const HIGHER_EDUCATION_INDICATORS: &[&str] = &[
    "superior completo",
    "bacharelado",
    "bacharel",
    "tecnologo",
    "licenciatura",
    "bachelor",
];

/// Keyword fragments identifying an undergraduate-level requirement.
pub const UNDERGRADUATE_REQUIREMENTS: &[&str] = &["graduacao", "ensino superior"];

/// A degree level that generic higher-education evidence must not satisfy.
#[derive(Debug, Clone, Copy)]
pub struct DegreeGuard {
    pub name: &'static str,
    pub markers: &'static [&'static str],
    pub evidence: &'static [&'static str],
}

pub const DEGREE_GUARDS: &[DegreeGuard] = &[
    DegreeGuard {
        name: "mestrado",
        markers: &["mestrado"],
        evidence: &["mestrado", "mestre", "msc", "master of science"],
    },
    DegreeGuard {
        name: "pos-graduacao",
        markers: &["pos graduacao", "posgraduacao"],
        evidence: &[
            "pos graduacao",
            "posgraduacao",
            "especializacao",
            "mba",
            "lato sensu",
            "mestrado",
            "doutorado",
        ],
    },
    DegreeGuard {
        name: "doutorado",
        markers: &["doutorado"],
        evidence: &["doutorado", "phd", "doutor"],
    },
];

/// Cloud provider tokens and the résumé evidence each one needs.
pub const CLOUD_PROVIDERS: &[(&str, &[&str])] = &[
    ("aws", &["aws", "amazon web services", "amazon aws"]),
    ("azure", &["azure", "microsoft azure"]),
    ("gcp", &["gcp", "google cloud", "google cloud platform"]),
];

pub fn is_connector(word: &str) -> bool {
    CONNECTOR_WORDS.contains(&word)
}
