// Copyright 2022 VMware, Inc.
// SPDX-License-Identifier: MIT
use kube::core::ErrorResponse;
use thiserror::Error;

/// APIError is the coarse-grained view of a failed request to the backing store
/// that the reconciler state machine branches on.
///
/// Only the `reason` of a Kubernetes Status object is kept; the full error is logged
/// by the store before it is translated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum APIError {
    #[error("NotFound")]
    ObjectNotFound,
    #[error("AlreadyExists")]
    ObjectAlreadyExists,
    #[error("BadRequest")]
    BadRequest,
    #[error("Conflict")]
    Conflict,
    #[error("Invalid")]
    Invalid,
    #[error("InternalError")]
    InternalError,
    #[error("Timeout")]
    Timeout,
    #[error("ServerTimeout")]
    ServerTimeout,
    #[error("Other")]
    Other,
}

impl APIError {
    pub fn is_object_not_found(&self) -> bool {
        matches!(self, APIError::ObjectNotFound)
    }
}

impl From<&kube::Error> for APIError {
    // TODO: match more error types, e.g., TooManyRequests and Forbidden.
    fn from(error: &kube::Error) -> APIError {
        match error {
            kube::Error::Api(ErrorResponse { reason, .. }) => match reason.as_str() {
                "NotFound" => APIError::ObjectNotFound,
                "AlreadyExists" => APIError::ObjectAlreadyExists,
                "BadRequest" => APIError::BadRequest,
                "Conflict" => APIError::Conflict,
                "Invalid" => APIError::Invalid,
                "InternalError" => APIError::InternalError,
                "Timeout" => APIError::Timeout,
                "ServerTimeout" => APIError::ServerTimeout,
                _ => APIError::Other,
            },
            _ => APIError::Other,
        }
    }
}
