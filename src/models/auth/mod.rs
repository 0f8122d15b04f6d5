pub mod requests;
pub mod responses;

pub use requests::{
    ChangePasswordRequest, LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest,
    RefreshTokenRequest, RegisterRequest,
};
pub use responses::{
    AuthTokens, LoginResponse, RefreshTokenResponse, UserInfoResponse,
};
