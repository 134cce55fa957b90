//! Operation dispatch.
//!
//! The platform delivers an operation name and positional string arguments.
//! [`Operation::parse`] turns them into a typed call; [`LocContract::invoke`]
//! runs it and encodes the response as JSON. The function names of the first
//! chaincode release are accepted alongside the current ones.

use loc_ledger::TransactionContext;
use serde::Serialize;
use tracing::debug;

use crate::contract::LocContract;
use crate::error::{ContractError, ContractResult};

/// A parsed invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Issue { record_json: String },
    AcknowledgeIssuance { id: String },
    AmendAmount { id: String, amount: i64 },
    AcknowledgeAmendment { id: String },
    SubmitDocuments { id: String, docs_urls: Vec<String> },
    AcceptDocuments { id: String },
    ConfirmPayment { id: String },
    AcknowledgePayment { id: String },
    Close { id: String },
    GetById { id: String },
    ListIssued,
    ListAdvising,
    ListNegotiating,
    GetHistory { id: String },
    Bootstrap,
}

type Parser = fn(&[&str]) -> ContractResult<Operation>;

/// Accepted names, current and legacy, with the parser for each.
const NAMES: &[(&str, Parser)] = &[
    ("Issue", parse_issue),
    ("IssueLoC", parse_issue),
    ("AcknowledgeIssuance", |args| {
        by_id("AcknowledgeIssuance", args, |id| Operation::AcknowledgeIssuance { id })
    }),
    ("AcknowledgeLoCIssuance", |args| {
        by_id("AcknowledgeIssuance", args, |id| Operation::AcknowledgeIssuance { id })
    }),
    ("AmendAmount", parse_amend_amount),
    ("AmendLoCAmount", parse_amend_amount),
    ("AcknowledgeAmendment", |args| {
        by_id("AcknowledgeAmendment", args, |id| Operation::AcknowledgeAmendment { id })
    }),
    ("AcknowledgeLoCAmendment", |args| {
        by_id("AcknowledgeAmendment", args, |id| Operation::AcknowledgeAmendment { id })
    }),
    ("SubmitDocuments", parse_submit_documents),
    ("AcceptDocuments", |args| {
        by_id("AcceptDocuments", args, |id| Operation::AcceptDocuments { id })
    }),
    ("ConfirmPayment", |args| {
        by_id("ConfirmPayment", args, |id| Operation::ConfirmPayment { id })
    }),
    ("AcknowledgePayment", |args| {
        by_id("AcknowledgePayment", args, |id| Operation::AcknowledgePayment { id })
    }),
    ("Close", |args| by_id("Close", args, |id| Operation::Close { id })),
    ("CloseLoC", |args| by_id("Close", args, |id| Operation::Close { id })),
    ("GetByID", |args| by_id("GetByID", args, |id| Operation::GetById { id })),
    ("GetLoCById", |args| by_id("GetByID", args, |id| Operation::GetById { id })),
    ("ListIssued", |args| nullary("ListIssued", args, Operation::ListIssued)),
    ("GetIssuedLoCs", |args| nullary("ListIssued", args, Operation::ListIssued)),
    ("ListAdvising", |args| nullary("ListAdvising", args, Operation::ListAdvising)),
    ("GetAdvisingLoCs", |args| nullary("ListAdvising", args, Operation::ListAdvising)),
    ("ListNegotiating", |args| {
        nullary("ListNegotiating", args, Operation::ListNegotiating)
    }),
    ("GetNegotiatingLoCs", |args| {
        nullary("ListNegotiating", args, Operation::ListNegotiating)
    }),
    ("GetHistory", |args| by_id("GetHistory", args, |id| Operation::GetHistory { id })),
    ("Bootstrap", |args| nullary("Bootstrap", args, Operation::Bootstrap)),
    ("InitLedger", |args| nullary("Bootstrap", args, Operation::Bootstrap)),
];

impl Operation {
    /// Resolve `name` (or one of its aliases) and check the arguments.
    pub fn parse(name: &str, args: &[&str]) -> ContractResult<Self> {
        let (_, parser) = NAMES
            .iter()
            .find(|(accepted, _)| *accepted == name)
            .ok_or_else(|| ContractError::UnknownOperation(name.to_string()))?;
        parser(args)
    }

    /// Canonical operation name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Issue { .. } => "Issue",
            Self::AcknowledgeIssuance { .. } => "AcknowledgeIssuance",
            Self::AmendAmount { .. } => "AmendAmount",
            Self::AcknowledgeAmendment { .. } => "AcknowledgeAmendment",
            Self::SubmitDocuments { .. } => "SubmitDocuments",
            Self::AcceptDocuments { .. } => "AcceptDocuments",
            Self::ConfirmPayment { .. } => "ConfirmPayment",
            Self::AcknowledgePayment { .. } => "AcknowledgePayment",
            Self::Close { .. } => "Close",
            Self::GetById { .. } => "GetByID",
            Self::ListIssued => "ListIssued",
            Self::ListAdvising => "ListAdvising",
            Self::ListNegotiating => "ListNegotiating",
            Self::GetHistory { .. } => "GetHistory",
            Self::Bootstrap => "Bootstrap",
        }
    }

    /// Returns `true` for operations that never write.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::GetById { .. }
                | Self::ListIssued
                | Self::ListAdvising
                | Self::ListNegotiating
                | Self::GetHistory { .. }
        )
    }
}

fn arity<'a, const N: usize>(op: &'static str, args: &[&'a str]) -> ContractResult<[&'a str; N]> {
    <[&str; N]>::try_from(args).map_err(|_| ContractError::InvalidArguments {
        op,
        cause: format!("expected {N} argument(s), got {}", args.len()),
    })
}

fn by_id(
    op: &'static str,
    args: &[&str],
    build: fn(String) -> Operation,
) -> ContractResult<Operation> {
    let [id] = arity::<1>(op, args)?;
    Ok(build(id.to_string()))
}

fn nullary(op: &'static str, args: &[&str], operation: Operation) -> ContractResult<Operation> {
    arity::<0>(op, args)?;
    Ok(operation)
}

fn parse_issue(args: &[&str]) -> ContractResult<Operation> {
    let [record] = arity::<1>("Issue", args)?;
    Ok(Operation::Issue {
        record_json: record.to_string(),
    })
}

fn parse_amend_amount(args: &[&str]) -> ContractResult<Operation> {
    let op = "AmendAmount";
    let [id, amount] = arity::<2>(op, args)?;
    let amount = amount
        .trim()
        .parse::<i64>()
        .map_err(|e| ContractError::serialization(op, id, format!("amount {amount:?}: {e}")))?;
    Ok(Operation::AmendAmount {
        id: id.to_string(),
        amount,
    })
}

fn parse_submit_documents(args: &[&str]) -> ContractResult<Operation> {
    let op = "SubmitDocuments";
    let [id, docs] = arity::<2>(op, args)?;
    let docs_urls: Vec<String> =
        serde_json::from_str(docs).map_err(|e| ContractError::serialization(op, id, e))?;
    Ok(Operation::SubmitDocuments {
        id: id.to_string(),
        docs_urls,
    })
}

impl LocContract {
    /// Parse and run one invocation, returning the JSON response.
    pub fn invoke<C: TransactionContext>(
        &self,
        ctx: &mut C,
        name: &str,
        args: &[&str],
    ) -> ContractResult<Vec<u8>> {
        let operation = Operation::parse(name, args)?;
        debug!(
            op = operation.name(),
            requested = name,
            read_only = operation.is_read_only(),
            "dispatching"
        );
        self.execute(ctx, operation)
    }

    /// Run an already-parsed operation.
    pub fn execute<C: TransactionContext>(
        &self,
        ctx: &mut C,
        operation: Operation,
    ) -> ContractResult<Vec<u8>> {
        let op = operation.name();
        match operation {
            Operation::Issue { record_json } => {
                respond(op, &self.issue(ctx, record_json.as_bytes())?)
            }
            Operation::AcknowledgeIssuance { id } => {
                respond(op, &self.acknowledge_issuance(ctx, &id)?)
            }
            Operation::AmendAmount { id, amount } => {
                respond(op, &self.amend_amount(ctx, &id, amount)?)
            }
            Operation::AcknowledgeAmendment { id } => {
                respond(op, &self.acknowledge_amendment(ctx, &id)?)
            }
            Operation::SubmitDocuments { id, docs_urls } => {
                respond(op, &self.submit_documents(ctx, &id, docs_urls)?)
            }
            Operation::AcceptDocuments { id } => respond(op, &self.accept_documents(ctx, &id)?),
            Operation::ConfirmPayment { id } => respond(op, &self.confirm_payment(ctx, &id)?),
            Operation::AcknowledgePayment { id } => {
                respond(op, &self.acknowledge_payment(ctx, &id)?)
            }
            Operation::Close { id } => respond(op, &self.close(ctx, &id)?),
            Operation::GetById { id } => respond(op, &self.get_by_id(&*ctx, &id)?),
            Operation::ListIssued => respond(op, &self.list_issued(&*ctx)?),
            Operation::ListAdvising => respond(op, &self.list_advising(&*ctx)?),
            Operation::ListNegotiating => respond(op, &self.list_negotiating(&*ctx)?),
            Operation::GetHistory { id } => respond(op, &self.history(&*ctx, &id)?),
            Operation::Bootstrap => respond(op, &self.bootstrap(ctx)?),
        }
    }
}

fn respond<T: Serialize>(op: &'static str, value: &T) -> ContractResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| ContractError::serialization(op, "", e))
}
