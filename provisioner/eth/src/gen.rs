use alloy::sol;

// Generate bindings around the staking pool that funds and registers DVT validators
sol! {
    #[derive(Debug)]
    #[sol(rpc)]
    contract StaderSSVStakePool {
        function depositEthToDepositContract(bytes calldata pubkey, bytes calldata withdrawCredential, bytes calldata signature, bytes32 depositDataRoot) external;
        function registerValidatorToSSVNetwork(bytes calldata pubkey, bytes[] calldata publicShares, bytes[] calldata sharesEncrypted, uint64[] calldata operatorIds, uint256 amount) external;
    }
}
