//! Analysis driver and pipeline orchestration

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::common::{CompileResult, Diagnostic, DiagnosticReporter, ErrorReporter, Severity};
use crate::dialect::{EvmDialect, EvmVersion, SideEffects};
use crate::frontend::{self, Object};
use crate::names::NameRepository;
use crate::sema::{AnalysisInfo, AsmAnalyzer, object_contains_msize};

/// Options for one analyzer run
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfig {
    pub evm_version: EvmVersion,
    /// Use `u256` / `bool` instead of the untyped dialect
    pub typed: bool,
    /// Data names accepted in addition to those the object declares
    pub data_names: Vec<String>,
    pub dump_tokens: bool,
    pub dump_ast: bool,
    pub dump_scopes: bool,
    pub verbose: bool,
}

impl AnalyzerConfig {
    pub fn name_repository(&self) -> NameRepository {
        if self.typed {
            NameRepository::new(EvmDialect::typed(self.evm_version))
        } else {
            NameRepository::new(EvmDialect::new(self.evm_version))
        }
    }
}

/// Analysis result for the code of one object
#[derive(Debug)]
pub struct ObjectAnalysis {
    /// Dotted path from the outermost object, empty for a bare block
    pub path: String,
    pub info: AnalysisInfo,
    pub side_effects: SideEffects,
    pub success: bool,
}

/// Everything one pipeline run produced
pub struct AnalysisOutcome {
    pub object: Object,
    pub names: NameRepository,
    pub objects: Vec<ObjectAnalysis>,
    pub diagnostics: Vec<Diagnostic>,
    pub contains_msize: bool,
}

impl AnalysisOutcome {
    pub fn success(&self) -> bool {
        self.objects.iter().all(|object| object.success)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }
}

/// Parses a source file and analyzes the code of every object in it
pub struct Pipeline {
    config: AnalyzerConfig,
}

impl Pipeline {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Read, parse and analyze a file, reporting everything to `reporter`
    pub fn analyze_file(&self, path: &Path, reporter: &mut DiagnosticReporter) -> CompileResult<AnalysisOutcome> {
        let source = fs::read_to_string(path)?;
        let file_id = reporter.add_file(path.display().to_string(), source.clone());
        self.analyze_source(&source, reporter, file_id)
    }

    /// Parse and analyze source that was already added to `reporter`
    pub fn analyze_source(
        &self,
        source: &str,
        reporter: &DiagnosticReporter,
        file_id: usize,
    ) -> CompileResult<AnalysisOutcome> {
        let config = &self.config;

        // Phase 1: Lexing (optional token dump)
        if config.dump_tokens {
            match frontend::dump_tokens(source) {
                Ok(tokens) => {
                    eprintln!("=== Yul Tokens ===");
                    eprint!("{}", tokens);
                    eprintln!("=== End Tokens ===\n");
                }
                Err(e) => {
                    reporter.report_error(file_id, &e);
                    return Err(e);
                }
            }
        }

        // Phase 2: Parsing
        if config.verbose {
            eprintln!("Parsing Yul...");
        }
        let mut names = config.name_repository();
        let object = match frontend::parse_source(source, &mut names) {
            Ok(object) => object,
            Err(e) => {
                reporter.report_error(file_id, &e);
                return Err(e);
            }
        };

        if config.dump_ast {
            eprintln!("=== Yul AST ===");
            eprintln!("{:#?}", object);
            eprintln!("=== End AST ===\n");
        }

        // Phase 3: Semantic analysis
        if config.verbose {
            eprintln!(
                "Analyzing for {} ({} dialect)...",
                config.evm_version,
                if config.typed { "typed" } else { "untyped" }
            );
        }
        let mut errors = ErrorReporter::new();
        let mut objects = Vec::new();
        self.analyze_object(&object, String::new(), &names, &mut errors, &mut objects);

        let diagnostics = errors.into_diagnostics();
        reporter.report_diagnostics(file_id, &diagnostics);

        if config.dump_scopes {
            for analysis in &objects {
                eprintln!("=== Scopes {} ===", analysis.path);
                eprint!("{}", analysis.info.dump(&names));
                eprintln!("=== End Scopes ===\n");
            }
        }

        let contains_msize = object_contains_msize(&object, &names);
        Ok(AnalysisOutcome {
            object,
            names,
            objects,
            diagnostics,
            contains_msize,
        })
    }

    fn analyze_object(
        &self,
        object: &Object,
        path: String,
        names: &NameRepository,
        errors: &mut ErrorReporter,
        results: &mut Vec<ObjectAnalysis>,
    ) {
        let mut data_names: BTreeSet<String> = object.qualified_data_names();
        data_names.extend(self.config.data_names.iter().cloned());

        if self.config.verbose && !object.name.is_empty() {
            eprintln!("  object {}", object.name);
        }

        let mut info = AnalysisInfo::new();
        let (success, side_effects) = {
            let mut analyzer = AsmAnalyzer::new(&mut info, errors, names, data_names);
            let success = analyzer.analyze(&object.code);
            (success, analyzer.side_effects())
        };
        results.push(ObjectAnalysis {
            path: path.clone(),
            info,
            side_effects,
            success,
        });

        for sub in &object.objects {
            let sub_path = if path.is_empty() {
                sub.name.clone()
            } else {
                format!("{}.{}", path, sub.name)
            };
            self.analyze_object(sub, sub_path, names, errors, results);
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}
