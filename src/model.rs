// src/model.rs

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

macro_rules! refactoring_kinds {
    ($($variant:ident => $display:literal, $pattern:literal $(, [$($group:literal),*])?;)*) => {
        /// Every refactoring type that can appear in a ground-truth description
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum RefactoringKind {
            $($variant,)*
        }

        impl RefactoringKind {
            /// All kinds, in declaration order
            pub const ALL: &'static [RefactoringKind] = &[$(RefactoringKind::$variant,)*];

            /// The literal prefix descriptions of this kind start with
            pub fn display_name(self) -> &'static str {
                match self {
                    $(RefactoringKind::$variant => $display,)*
                }
            }

            /// Grammar of a full description of this kind
            pub fn pattern(self) -> &'static str {
                match self {
                    $(RefactoringKind::$variant => $pattern,)*
                }
            }

            /// Pattern groups that differ between the component lines of one
            /// logical refactoring. Replaced by `*` in wildcard aggregation.
            pub fn aggregate_groups(self) -> &'static [usize] {
                match self {
                    $(RefactoringKind::$variant => &[$($($group),*)?],)*
                }
            }
        }
    };
}

refactoring_kinds! {
    ExtractMethod => "Extract Method", r"Extract Method (.+) extracted from (.+) in class (.+)", [2];
    RenameClass => "Rename Class", r"Rename Class (.+) renamed to (.+)";
    MoveAttribute => "Move Attribute", r"Move Attribute (.+) from class (.+) to (.+) from class (.+)";
    MoveRenameAttribute => "Move And Rename Attribute", r"Move And Rename Attribute (.+) renamed to (.+) and moved from class (.+) to class (.+)";
    ReplaceAttribute => "Replace Attribute", r"Replace Attribute (.+) from class (.+) with (.+) from class (.+)";
    RenameMethod => "Rename Method", r"Rename Method (.+) renamed to (.+) in class (.+)";
    InlineMethod => "Inline Method", r"Inline Method (.+) inlined to (.+) in class (.+)", [2];
    MoveMethod => "Move Method", r"Move Method (.+) from class (.+) to (.+) from class (.+)";
    MoveAndRenameMethod => "Move And Rename Method", r"Move And Rename Method (.+) from class (.+) to (.+) from class (.+)";
    PullUpMethod => "Pull Up Method", r"Pull Up Method (.+) from class (.+) to (.+) from class (.+)", [1, 2];
    MoveClass => "Move Class", r"Move Class (.+) moved to (.+)";
    MoveRenameClass => "Move And Rename Class", r".+";
    MoveSourceFolder => "Move Source Folder", r"Move Source Folder (.+) to (.+)";
    PullUpAttribute => "Pull Up Attribute", r"Pull Up Attribute (.+) from class (.+) to (.+) from class (.+)", [2];
    PushDownAttribute => "Push Down Attribute", r"Push Down Attribute (.+) from class (.+) to (.+) from class (.+)", [3];
    PushDownMethod => "Push Down Method", r"Push Down Method (.+) from class (.+) to (.+) from class (.+)", [3, 4];
    ExtractInterface => "Extract Interface", r"Extract Interface (.+) from classes \[(.+)\]", [2];
    ExtractSuperclass => "Extract Superclass", r"Extract Superclass (.+) from classes \[(.+)\]", [2];
    ExtractSubclass => "Extract Subclass", r"Extract Subclass (.+) from class (.+)";
    ExtractClass => "Extract Class", r"Extract Class (.+) from class (.+)";
    ExtractAndMoveMethod => "Extract And Move Method", r"Extract And Move Method (.+) extracted from (.+) in class (.+) & moved to class (.+)";
    MoveAndInlineMethod => "Move And Inline Method", r"Move And Inline Method (.+) moved from class (.+) to class (.+) & inlined to (.+)";
    ReplaceAnonymousWithClass => "Replace Anonymous With Class", r"Replace Anonymous With Class (.+) with (.+)";
    IntroducePolymorphism => "Introduce Polymorphism", r".+";
    RenamePackage => "Rename Package", r"Rename Package (.+) to (.+)";
    MovePackage => "Move Package", r"Move Package (.+) to (.+)";
    ExtractVariable => "Extract Variable", r"Extract Variable (.+) in method (.+) from class (.+)";
    ExtractAttribute => "Extract Attribute", r"Extract Attribute (.+) in class (.+)";
    InlineVariable => "Inline Variable", r"Inline Variable (.+) in method (.+) from class (.+)";
    InlineAttribute => "Inline Attribute", r"Inline Attribute (.+) in class (.+)";
    RenameVariable => "Rename Variable", r"Rename Variable (.+) to (.+) in method (.+) from class (.+)";
    RenameParameter => "Rename Parameter", r"Rename Parameter (.+) to (.+) in method (.+) from class (.+)";
    RenameAttribute => "Rename Attribute", r"Rename Attribute (.+) to (.+) in class (.+)";
    MergeVariable => "Merge Variable", r"Merge Variable \[(.+)\] to (.+) in method (.+) from class (.+)";
    MergeParameter => "Merge Parameter", r"Merge Parameter \[(.+)\] to (.+) in method (.+) from class (.+)";
    MergeAttribute => "Merge Attribute", r"Merge Attribute \[(.+)\] to (.+) in class (.+)";
    SplitVariable => "Split Variable", r"Split Variable (.+) to \[(.+)\] in method (.+) from class (.+)";
    SplitParameter => "Split Parameter", r"Split Parameter (.+) to \[(.+)\] in method (.+) from class (.+)";
    SplitAttribute => "Split Attribute", r"Split Attribute (.+) to \[(.+)\] in class (.+)";
    ReplaceVariableWithAttribute => "Replace Variable With Attribute", r"Replace Variable With Attribute (.+) to (.+) in method (.+) from class (.+)";
    ReplaceAttributeWithVariable => "Replace Attribute With Variable", r"Replace Attribute With Variable (.+) to (.+) in method (.+) from class (.+)";
    ParameterizeVariable => "Parameterize Variable", r"Parameterize Variable (.+) to (.+) in method (.+) from class (.+)";
    LocalizeParameter => "Localize Parameter", r"Localize Parameter (.+) to (.+) in method (.+) from class (.+)";
    ParameterizeAttribute => "Parameterize Attribute", r"Parameterize Attribute (.+) to (.+) in method (.+) from class (.+)";
    ChangeReturnType => "Change Return Type", r"Change Return Type (.+) to (.+) in method (.+) from class (.+)";
    ChangeVariableType => "Change Variable Type", r"Change Variable Type (.+) to (.+) in method (.+) from class (.+)";
    ChangeParameterType => "Change Parameter Type", r"Change Parameter Type (.+) to (.+) in method (.+) from class (.+)";
    ChangeAttributeType => "Change Attribute Type", r"Change Attribute Type (.+) to (.+) in class (.+)";
    AddMethodAnnotation => "Add Method Annotation", r"Add Method Annotation (.+) in method (.+) from class (.+)";
    RemoveMethodAnnotation => "Remove Method Annotation", r"Remove Method Annotation (.+) in method (.+) from class (.+)";
    ModifyMethodAnnotation => "Modify Method Annotation", r"Modify Method Annotation (.+) to (.+) in method (.+) from class (.+)";
    AddAttributeAnnotation => "Add Attribute Annotation", r"Add Attribute Annotation (.+) in attribute (.+) from class (.+)";
    RemoveAttributeAnnotation => "Remove Attribute Annotation", r"Remove Attribute Annotation (.+) in attribute (.+) from class (.+)";
    ModifyAttributeAnnotation => "Modify Attribute Annotation", r"Modify Attribute Annotation (.+) to (.+) in attribute (.+) from class (.+)";
    AddClassAnnotation => "Add Class Annotation", r"Add Class Annotation (.+) in class (.+)";
    RemoveClassAnnotation => "Remove Class Annotation", r"Remove Class Annotation (.+) in class (.+)";
    ModifyClassAnnotation => "Modify Class Annotation", r"Modify Class Annotation (.+) to (.+) in class (.+)";
    AddParameterAnnotation => "Add Parameter Annotation", r"Add Parameter Annotation (.+) in parameter (.+) in method (.+) from class (.+)";
    RemoveParameterAnnotation => "Remove Parameter Annotation", r"Remove Parameter Annotation (.+) in parameter (.+) in method (.+) from class (.+)";
    ModifyParameterAnnotation => "Modify Parameter Annotation", r"Modify Parameter Annotation (.+) to (.+) in parameter (.+) in method (.+) from class (.+)";
    AddParameter => "Add Parameter", r"Add Parameter (.+) in method (.+) from class (.+)";
    RemoveParameter => "Remove Parameter", r"Remove Parameter (.+) in method (.+) from class (.+)";
    ReorderParameter => "Reorder Parameter", r"Reorder Parameter \[(.+)\] to \[(.+)\] in method (.+) from class (.+)";
    AddVariableAnnotation => "Add Variable Annotation", r"Add Variable Annotation (.+) in variable (.+) in method (.+) from class (.+)";
    RemoveVariableAnnotation => "Remove Variable Annotation", r"Remove Variable Annotation (.+) in variable (.+) in method (.+) from class (.+)";
    ModifyVariableAnnotation => "Modify Variable Annotation", r"Modify Variable Annotation (.+) to (.+) in variable (.+) in method (.+) from class (.+)";
    AddThrownExceptionType => "Add Thrown Exception Type", r"Add Thrown Exception Type (.+) in method (.+) from class (.+)";
    RemoveThrownExceptionType => "Remove Thrown Exception Type", r"Remove Thrown Exception Type (.+) in method (.+) from class (.+)";
    ChangeThrownExceptionType => "Change Thrown Exception Type", r"Change Thrown Exception Type (.+) to (.+) in method (.+) from class (.+)";
    ChangeMethodAccessModifier => "Change Method Access Modifier", r"Change Method Access Modifier (.+) to (.+) in method (.+) from class (.+)";
    ChangeAttributeAccessModifier => "Change Attribute Access Modifier", r"Change Attribute Access Modifier (.+) to (.+) in attribute (.+) from class (.+)";
    EncapsulateAttribute => "Encapsulate Attribute", r"Encapsulate Attribute (.+) from class (.+)";
    AddMethodModifier => "Add Method Modifier", r"Add Method Modifier (.+) in method (.+) from class (.+)";
    RemoveMethodModifier => "Remove Method Modifier", r"Remove Method Modifier (.+) in method (.+) from class (.+)";
    AddAttributeModifier => "Add Attribute Modifier", r"Add Attribute Modifier (.+) in attribute (.+) from class (.+)";
    RemoveAttributeModifier => "Remove Attribute Modifier", r"Remove Attribute Modifier (.+) in attribute (.+) from class (.+)";
    AddVariableModifier => "Add Variable Modifier", r"Add Variable Modifier (.+) in variable (.+) in method (.+) from class (.+)";
    AddParameterModifier => "Add Parameter Modifier", r"Add Parameter Modifier (.+) in parameter (.+) in method (.+) from class (.+)";
    RemoveVariableModifier => "Remove Variable Modifier", r"Remove Variable Modifier (.+) in variable (.+) in method (.+) from class (.+)";
    RemoveParameterModifier => "Remove Parameter Modifier", r"Remove Parameter Modifier (.+) in parameter (.+) in method (.+) from class (.+)";
    ChangeClassAccessModifier => "Change Class Access Modifier", r"Change Class Access Modifier (.+) to (.+) in class (.+)";
    AddClassModifier => "Add Class Modifier", r"Add Class Modifier (.+) in class (.+)";
    RemoveClassModifier => "Remove Class Modifier", r"Remove Class Modifier (.+) in class (.+)";
    SplitPackage => "Split Package", r"Split Package (.+) to \[(.+)\]";
    MergePackage => "Merge Package", r"Merge Package \[(.+)\] to (.+)";
    ChangeTypeDeclarationKind => "Change Type Declaration Kind", r"Change Type Declaration Kind (.+) to (.+) in type (.+)";
    CollapseHierarchy => "Collapse Hierarchy", r"Collapse Hierarchy (.+) to (.+)";
    ReplaceLoopWithPipeline => "Replace Loop With Pipeline", r"Replace Loop With Pipeline (.+) with (.+) in method (.+) from class (.+)";
    ReplacePipelineWithLoop => "Replace Pipeline With Loop", r"Replace Pipeline With Loop (.+) with (.+) in method (.+) from class (.+)";
    ReplaceAnonymousWithLambda => "Replace Anonymous With Lambda", r"Replace Anonymous With Lambda (.+) with (.+) in method (.+) from class (.+)";
    MergeClass => "Merge Class", r"Merge Class \[(.+)\] to (.+)";
    SplitClass => "Split Class", r"Split Class (.+) to \[(.+)\]";
    SplitConditional => "Split Conditional", r"Split Conditional (.+) to \[(.+)\] in method (.+) from class (.+)";
    InvertCondition => "Invert Condition", r"Invert Condition (.+) to (.+) in method (.+) from class (.+)";
    MergeConditional => "Merge Conditional", r"Merge Conditional \[(.+)\] to (.+) in method (.+) from class (.+)";
    MergeCatch => "Merge Catch", r"Merge Catch \[(.+)\] to (.+) in method (.+) from class (.+)";
    MergeMethod => "Merge Method", r"Merge Method \[(.+)\] to (.+) in class (.+)";
    SplitMethod => "Split Method", r"Split Method (.+) to \[(.+)\] in class (.+)";
    MoveCode => "Move Code", r"Move Code from (.+) to (.+) in class (.+)";
    ParameterizeTest => "Parameterize Test", r"Parameterize Test (.+) to (.+) in class (.+)";
    AssertThrows => "Assert Throws", r"Assert Throws (.+) in method (.+) from class (.+)";
    TryWithResources => "Try With Resources", r"Try With Resources (.+) in method (.+) from class (.+)";
    ReplaceGenericWithDiamond => "Replace Generic With Diamond", r"Replace Generic With Diamond (.+) with (.+) in method (.+) from class (.+)";
    ReplaceConditionalWithTernary => "Replace Conditional With Ternary", r"Replace Conditional With Ternary (.+) to (.+) in method (.+) from class (.+)";
}

impl fmt::Display for RefactoringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Serialize for RefactoringKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_name())
    }
}

/// Fully-qualified source and target of a Move Class description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMove {
    pub source: String,
    pub target: String,
}

/// A single ground-truth claim, as handed to us
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefactoringAssertion {
    pub kind: RefactoringKind,
    pub raw_text: String,
    /// Only present for `MoveClass`
    pub class_move: Option<ClassMove>,
}

/// An assertion whose text has been through the normalizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAssertion {
    pub kind: RefactoringKind,
    pub text: String,
}

/// Final descriptions of one kind for one commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedRecord {
    pub kind: RefactoringKind,
    pub descriptions: Vec<String>,
}

/// Folder evidence gathered for one Move Class candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReclassificationDecision {
    pub from_package: String,
    pub to_package: String,
    /// Destination package already had source files before the commit
    pub exists_before: bool,
    /// Source package still has source files after the commit
    pub exists_after: bool,
}

impl ReclassificationDecision {
    pub fn collapse_to_package_rename(&self) -> bool {
        !self.exists_before && !self.exists_after
    }

    /// `Move Class from pkg- a.b to pkg+ a.c`: `~` marks a package present on
    /// the other side of the commit, `-` one that is gone after, `+` one that
    /// is new.
    ///
    /// Decisions exist only for Move Class candidates, so other assertions
    /// never get an evidence line.
    pub fn evidence_notation(&self) -> String {
        format!(
            "Move Class from pkg{} {} to pkg{} {}",
            if self.exists_after { '~' } else { '-' },
            self.from_package,
            if self.exists_before { '~' } else { '+' },
            self.to_package
        )
    }
}

/// Everything produced for one commit batch
#[derive(Debug, Clone, Serialize)]
pub struct CommitResult {
    pub id: Option<u64>,
    pub clone_url: String,
    pub commit: String,
    /// Set when the repository had to be consulted
    pub committed_at: Option<DateTime<Utc>>,
    pub true_positive: bool,
    pub records: Vec<AggregatedRecord>,
    pub decisions: Vec<ReclassificationDecision>,
}

/// One persisted row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRow<'a> {
    pub clone_url: &'a str,
    pub commit: &'a str,
    pub refactoring_type: RefactoringKind,
    pub description: &'a str,
    pub true_positive: bool,
}

impl CommitResult {
    pub fn rows(&self) -> impl Iterator<Item = OutputRow<'_>> {
        self.records.iter().flat_map(move |record| {
            record.descriptions.iter().map(move |description| OutputRow {
                clone_url: &self.clone_url,
                commit: &self.commit,
                refactoring_type: record.kind,
                description,
                true_positive: self.true_positive,
            })
        })
    }

    pub fn description_count(&self) -> usize {
        self.records.iter().map(|r| r.descriptions.len()).sum()
    }
}
