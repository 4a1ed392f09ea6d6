use alloy::sol;

sol! {
    /// What the gateway does when a cross-chain call fails on the destination side
    #[derive(Debug, PartialEq, Eq)]
    struct RevertOptions {
        address revertAddress;
        bool callOnRevert;
        address abortAddress;
        bytes revertMessage;
        uint256 onRevertGasLimit;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct CallOptions {
        uint256 gasLimit;
        bool isArbitraryCall;
    }

    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IERC721 {
        function approve(address to, uint256 tokenId) external;
    }

    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
    }

    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IZRC20 {
        function withdrawGasFeeWithGasLimit(uint256 gasLimit) external view returns (address, uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IUniversal {
        function isUniversal() external view returns (bool);
    }

    /// NFT contract deployed on the universal chain
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface UniversalNFT {
        function transferCrossChain(
            uint256 tokenId,
            bytes memory receiver,
            address destination,
            CallOptions memory callOptions,
            RevertOptions memory revertOptions
        ) external;
        function setConnected(address zrc20, bytes memory contractAddress) external;
    }

    /// NFT contract deployed on a connected chain
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface ConnectedNFT {
        function transferCrossChain(
            uint256 tokenId,
            address receiver,
            address destination,
            RevertOptions memory revertOptions
        ) external payable;
        function setUniversal(address contractAddress) external;
    }

    #[allow(missing_docs)]
    #[sol(rpc)]
    interface SwapStats {
        function setSwapContract(address swapContract) external;
    }

    #[allow(missing_docs)]
    #[sol(rpc)]
    interface Swap {
        function setStatTracker(address statTracker) external;
    }

    #[allow(missing_docs)]
    #[sol(rpc)]
    interface DelayedSwapExecutor {
        function scheduleSwap(
            address inputToken,
            uint256 amount,
            address targetToken,
            bytes memory recipient,
            bool withdrawFlag,
            uint256 delay
        ) external;
        function executeSwap(uint256 orderId) external;
    }
}
